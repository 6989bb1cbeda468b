//! Dune terrain height field
//!
//! Built once from an analytic sum of three sinusoids. The plane is authored in
//! (x, y) with heights along its normal and laid flat, so a sample at plane
//! coordinates `(x, y)` sits at world `(x, h(x, y), -y)`.
//!
//! Normals are accumulated from the perturbed triangles (area-weighted) after
//! every height is assigned; the flat plane's normals do not survive the
//! displacement.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, ConfigResult};

/// Dune height at plane coordinates `(x, y)`
#[inline]
pub fn dune_height(x: f32, y: f32) -> f32 {
    let nx = x / DUNE_SCALE;
    let ny = y / DUNE_SCALE;
    nx.sin() * 3.0 + (ny * 1.3).cos() * 2.5 + (nx * 0.3 + ny * 0.7).sin() * 1.8
}

/// Terrain generation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Edge length of the square plane (world units)
    pub size: f32,
    /// Subdivisions per side; the grid has `segments + 1` samples per side
    pub segments: u32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: TERRAIN_SIZE,
            segments: TERRAIN_SEGMENTS,
        }
    }
}

impl TerrainConfig {
    pub fn with_segments(segments: u32) -> Self {
        Self {
            segments,
            ..Default::default()
        }
    }
}

/// Immutable grid of dune samples with per-sample normals
#[derive(Debug, Clone)]
pub struct HeightField {
    config: TerrainConfig,
    heights: Vec<f32>,
    normals: Vec<Vec3>,
}

impl HeightField {
    pub fn generate(config: TerrainConfig) -> ConfigResult<Self> {
        if config.segments == 0 {
            return Err(ConfigError::terrain("grid needs at least one segment"));
        }
        if !(config.size > 0.0) {
            return Err(ConfigError::terrain(format!(
                "plane size must be positive, got {}",
                config.size
            )));
        }

        let side = config.segments as usize + 1;
        let mut field = Self {
            config,
            heights: Vec::with_capacity(side * side),
            normals: vec![Vec3::ZERO; side * side],
        };

        for iy in 0..side {
            for ix in 0..side {
                let (x, y) = field.plane_coords(ix, iy);
                field.heights.push(dune_height(x, y));
            }
        }
        field.compute_normals();

        log::info!(
            "Terrain built: {}x{} samples over {} units",
            side,
            side,
            config.size
        );
        Ok(field)
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Samples per side
    #[inline]
    pub fn side(&self) -> usize {
        self.config.segments as usize + 1
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    #[inline]
    fn index(&self, ix: usize, iy: usize) -> usize {
        iy * self.side() + ix
    }

    /// Plane coordinates of grid sample `(ix, iy)`; rows run from +y down to -y
    pub fn plane_coords(&self, ix: usize, iy: usize) -> (f32, f32) {
        let step = self.config.size / self.config.segments as f32;
        let half = self.config.size / 2.0;
        (ix as f32 * step - half, half - iy as f32 * step)
    }

    pub fn height(&self, ix: usize, iy: usize) -> f32 {
        self.heights[self.index(ix, iy)]
    }

    pub fn normal(&self, ix: usize, iy: usize) -> Vec3 {
        self.normals[self.index(ix, iy)]
    }

    /// World-space position of grid sample `(ix, iy)`
    pub fn position(&self, ix: usize, iy: usize) -> Vec3 {
        let (x, y) = self.plane_coords(ix, iy);
        Vec3::new(x, self.height(ix, iy), -y)
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Triangle list over the grid, two triangles per cell, counter-clockwise from above
    pub fn triangle_indices(&self) -> Vec<u32> {
        let side = self.side();
        let segs = self.config.segments as usize;
        let mut indices = Vec::with_capacity(segs * segs * 6);
        for iy in 0..segs {
            for ix in 0..segs {
                let a = (iy * side + ix) as u32;
                let b = ((iy + 1) * side + ix) as u32;
                let c = ((iy + 1) * side + ix + 1) as u32;
                let d = (iy * side + ix + 1) as u32;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
        indices
    }

    fn compute_normals(&mut self) {
        let side = self.side();
        let positions: Vec<Vec3> = (0..side * side)
            .map(|i| self.position(i % side, i / side))
            .collect();

        let mut accum = vec![Vec3::ZERO; positions.len()];
        for tri in self.triangle_indices().chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            // Unnormalized cross product weights each face by its area
            let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
            accum[a] += face;
            accum[b] += face;
            accum[c] += face;
        }

        for (normal, sum) in self.normals.iter_mut().zip(accum) {
            *normal = sum.normalize_or(Vec3::Y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> HeightField {
        HeightField::generate(TerrainConfig::with_segments(16)).unwrap()
    }

    #[test]
    fn test_height_is_pure() {
        for (x, y) in [(0.0, 0.0), (123.4, -56.7), (-400.0, 400.0)] {
            assert_eq!(dune_height(x, y).to_bits(), dune_height(x, y).to_bits());
        }
        // sin(0)*3 + cos(0)*2.5 + sin(0)*1.8
        assert!((dune_height(0.0, 0.0) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_grid_dimensions() {
        let field = small();
        assert_eq!(field.side(), 17);
        assert_eq!(field.len(), 17 * 17);
        assert_eq!(field.normals().len(), field.len());
        assert_eq!(field.triangle_indices().len(), 16 * 16 * 6);
    }

    #[test]
    fn test_grid_spans_plane() {
        let field = small();
        assert_eq!(field.plane_coords(0, 0), (-400.0, 400.0));
        assert_eq!(field.plane_coords(16, 16), (400.0, -400.0));
        let p = field.position(16, 0);
        assert_eq!((p.x, p.z), (400.0, -400.0));
        assert_eq!(p.y, dune_height(400.0, 400.0));
    }

    #[test]
    fn test_normals_are_unit_and_face_up() {
        let field = HeightField::generate(TerrainConfig::default()).unwrap();
        for n in field.normals() {
            assert!((n.length() - 1.0).abs() < 1e-4);
            assert!(n.y > 0.5, "normal {n} is too steep for gentle dunes");
        }
    }

    #[test]
    fn test_normals_follow_slope() {
        // Along x the dominant term is 3*sin(x/80); near x=0 height rises with x,
        // so the surface normal must lean towards -x.
        let field = HeightField::generate(TerrainConfig::with_segments(64)).unwrap();
        let mid = field.side() / 2;
        assert!(field.normal(mid, mid).x < 0.0);
    }

    #[test]
    fn test_rejects_degenerate_config() {
        assert!(HeightField::generate(TerrainConfig::with_segments(0)).is_err());
        let config = TerrainConfig {
            size: 0.0,
            segments: 8,
        };
        assert!(matches!(
            HeightField::generate(config),
            Err(ConfigError::InvalidTerrain(_))
        ));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = small();
        let b = small();
        assert_eq!(a.heights(), b.heights());
        assert_eq!(a.normals(), b.normals());
    }
}
