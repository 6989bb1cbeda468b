//! Mesh generation for the terrain and the convoy

use glam::Vec3;
use std::f32::consts::TAU;

use super::vertex::{SceneVertex, VertexKind, colors};
use crate::cinematic::CarLayout;
use crate::cinematic::convoy::car;
use crate::hex_to_linear;
use crate::terrain::HeightField;

/// Indexed triangle list
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<SceneVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Append another mesh, rebasing its indices
    pub fn append(&mut self, other: MeshData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }
}

/// Sand surface from a generated height field
pub fn terrain_mesh(field: &HeightField) -> MeshData {
    let color = hex_to_linear(colors::SAND);
    let side = field.side();
    let mut vertices = Vec::with_capacity(field.len());
    for iy in 0..side {
        for ix in 0..side {
            vertices.push(SceneVertex::new(
                field.position(ix, iy).to_array(),
                field.normal(ix, iy).to_array(),
                color,
                VertexKind::Static,
            ));
        }
    }
    MeshData {
        vertices,
        indices: field.triangle_indices(),
    }
}

/// Axis-aligned box with flat-shaded faces
pub fn box_mesh(center: Vec3, size: Vec3, color: [f32; 4], kind: VertexKind) -> MeshData {
    let h = size / 2.0;
    // (normal, u axis, v axis) per face; u x v == normal keeps winding CCW
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut mesh = MeshData::default();
    for (normal, u, v) in faces {
        let base = mesh.vertices.len() as u32;
        let c = center + normal * h;
        let (u, v) = (u * h, v * h);
        for corner in [c - u - v, c + u - v, c + u + v, c - u + v] {
            mesh.vertices
                .push(SceneVertex::new(corner.to_array(), normal.to_array(), color, kind));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Wheel cylinder with its axle along X, centred on `hub`
pub fn wheel_mesh(hub: Vec3, radius: f32, width: f32, segments: u32, color: [f32; 4]) -> MeshData {
    let half = width / 2.0;
    let ring = |i: u32| {
        let theta = i as f32 / segments as f32 * TAU;
        Vec3::new(0.0, theta.cos(), theta.sin())
    };
    let vertex = |p: Vec3, n: Vec3| SceneVertex::wheel(p.to_array(), n.to_array(), color, hub.to_array());

    let mut mesh = MeshData::default();

    // Tread
    for i in 0..segments {
        let base = mesh.vertices.len() as u32;
        let (r0, r1) = (ring(i), ring(i + 1));
        for (r, x) in [(r0, -half), (r0, half), (r1, half), (r1, -half)] {
            mesh.vertices.push(vertex(hub + Vec3::X * x + r * radius, r));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
    }

    // Side caps as triangle fans
    for side in [-1.0f32, 1.0] {
        let normal = Vec3::X * side;
        let center = mesh.vertices.len() as u32;
        mesh.vertices.push(vertex(hub + normal * half, normal));
        for i in 0..segments {
            mesh.vertices.push(vertex(hub + normal * half + ring(i) * radius, normal));
        }
        for i in 0..segments {
            let a = center + 1 + i;
            let b = center + 1 + (i + 1) % segments;
            if side > 0.0 {
                mesh.indices.extend_from_slice(&[center, a, b]);
            } else {
                mesh.indices.extend_from_slice(&[center, b, a]);
            }
        }
    }

    mesh
}

/// One car in convoy space: body, cab and four wheels
pub fn car_mesh(layout: &CarLayout) -> MeshData {
    let paint = hex_to_linear(layout.color);
    let tyre = hex_to_linear(car::TYRE_COLOR);

    let mut mesh = box_mesh(
        layout.offset + car::BODY_CENTER,
        car::BODY_SIZE,
        paint,
        VertexKind::Convoy,
    );
    mesh.append(box_mesh(
        layout.offset + car::CAB_CENTER,
        car::CAB_SIZE,
        paint,
        VertexKind::Convoy,
    ));
    for hub in car::WHEEL_HUBS {
        mesh.append(wheel_mesh(
            layout.offset + hub,
            car::WHEEL_RADIUS,
            car::WHEEL_WIDTH,
            car::WHEEL_SEGMENTS,
            tyre,
        ));
    }
    mesh
}

/// Every car of the convoy in one mesh
pub fn convoy_mesh(layout: &[CarLayout]) -> MeshData {
    let mut mesh = MeshData::default();
    for car in layout {
        mesh.append(car_mesh(car));
    }
    mesh
}
