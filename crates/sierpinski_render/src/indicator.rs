//! Unit sphere used to mark the active light

use std::f32::consts::{PI, TAU};

use sierpinski_math::Vec3;

/// A unit UV sphere as a triangle list of positions
///
/// The normal of each vertex equals its position.
#[derive(Clone, Debug, PartialEq)]
pub struct SphereMesh {
    pub positions: Vec<Vec3>,
}

impl SphereMesh {
    pub const SLICES: u32 = 20;
    pub const STACKS: u32 = 20;

    /// Build a sphere with the given number of longitude slices and latitude stacks
    pub fn new(slices: u32, stacks: u32) -> Self {
        let slices = slices.max(3);
        let stacks = stacks.max(2);

        let point = |stack: u32, slice: u32| {
            let phi = PI * stack as f32 / stacks as f32;
            let theta = TAU * slice as f32 / slices as f32;
            Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
        };

        let mut positions = Vec::with_capacity((slices * stacks * 6) as usize);
        for stack in 0..stacks {
            for slice in 0..slices {
                let a = point(stack, slice);
                let b = point(stack + 1, slice);
                let c = point(stack + 1, slice + 1);
                let d = point(stack, slice + 1);

                // pole rows collapse one triangle of each quad
                if stack != 0 {
                    positions.extend_from_slice(&[a, b, d]);
                }
                if stack + 1 != stacks {
                    positions.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { positions }
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }
}

impl Default for SphereMesh {
    fn default() -> Self {
        Self::new(Self::SLICES, Self::STACKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_vertices_on_unit_sphere() {
        let sphere = SphereMesh::default();
        for p in &sphere.positions {
            assert!((p.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_sphere_triangle_count() {
        // two triangles per quad, minus one per quad in each pole row
        let sphere = SphereMesh::new(8, 4);
        assert_eq!(sphere.triangle_count(), 8 * 4 * 2 - 2 * 8);
    }

    #[test]
    fn test_sphere_minimum_resolution() {
        let sphere = SphereMesh::new(0, 0);
        assert_eq!(sphere.triangle_count(), 3 * 2 * 2 - 2 * 3);
    }
}
