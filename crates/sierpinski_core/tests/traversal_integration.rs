//! Integration tests for the subdivision and traversal pipeline
//!
//! These tests exercise the geometry engine and the scene renderer together:
//! 1. Subdivision properties (midpoints, volume, determinism)
//! 2. Face normals (unit length, scale invariance)
//! 3. Primitive counts through the traversal and the full scene
//! 4. Depth clamping at configuration time

use sierpinski_core::{
    draw_scene, render_tetrahedron, Palette, PrimitiveCount, PrimitiveCounter, SceneEvent,
    SceneSettings, SceneState,
};
use sierpinski_math::{face_normal, subdivide, Tetrahedron, Vec3, FACES};

fn sample_tetrahedra() -> [Tetrahedron; 3] {
    [
        Tetrahedron::REGULAR,
        Tetrahedron::PYRAMID,
        Tetrahedron::from_arrays([
            [0.3, -1.2, 0.7],
            [2.5, 0.1, -0.4],
            [-1.1, 1.9, 0.2],
            [0.6, 0.4, 3.3],
        ]),
    ]
}

// ==================== Subdivision Tests ====================

#[test]
fn test_children_reproduce_each_midpoint() {
    for t in sample_tetrahedra() {
        let midpoints = t.edge_midpoints();
        let children = subdivide(&t);
        assert_eq!(children.len(), 4);

        // distinct non-corner child vertices are exactly the 6 midpoints
        let mut distinct: Vec<Vec3> = Vec::new();
        for child in &children {
            for v in &child.vertices[1..] {
                if !distinct.contains(v) {
                    distinct.push(*v);
                }
            }
        }
        assert_eq!(distinct.len(), 6);
        for m in midpoints {
            assert!(distinct.contains(&m), "missing midpoint {:?}", m);
        }
    }
}

#[test]
fn test_children_fill_half_the_volume() {
    for t in sample_tetrahedra() {
        let parent = t.volume();
        let children: f32 = subdivide(&t).iter().map(Tetrahedron::volume).sum();
        assert!(
            (children - parent / 2.0).abs() < 1e-4 * parent.max(1.0),
            "parent {} children {}",
            parent,
            children
        );
    }
}

#[test]
fn test_subdivide_twice_is_identical() {
    for t in sample_tetrahedra() {
        let first = subdivide(&t);
        let second = subdivide(&t);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.vertices, b.vertices);
        }
    }
}

#[test]
fn test_grandchildren_are_one_sixty_fourth() {
    let t = Tetrahedron::REGULAR;
    let expected = t.volume() / 64.0;
    for child in subdivide(&t) {
        for grandchild in subdivide(&child) {
            assert!((grandchild.volume() - expected).abs() < 1e-5);
        }
    }
}

// ==================== Normal Tests ====================

#[test]
fn test_face_normals_are_unit_and_scale_invariant() {
    for t in sample_tetrahedra() {
        for scale in [0.25f32, 1.0, 3.0, 40.0] {
            let scaled = t.scaled(scale);
            for face in FACES {
                let n = face_normal(&t, face);
                let ns = face_normal(&scaled, face);
                assert!((ns.length() - 1.0).abs() < 1e-5);
                assert!(n.approx_eq(ns, 1e-4), "scale {} face {:?}: {:?} vs {:?}", scale, face, n, ns);
            }
        }
    }
}

// ==================== Traversal Tests ====================

#[test]
fn test_end_to_end_depth_one() {
    let mut counter = PrimitiveCounter::new();
    render_tetrahedron(&mut counter, &Tetrahedron::REGULAR, 1, true, &Palette::default());
    assert_eq!(counter.lines, 24);
    assert_eq!(counter.triangles, 16);

    let mut counter = PrimitiveCounter::new();
    render_tetrahedron(&mut counter, &Tetrahedron::REGULAR, 1, false, &Palette::default());
    assert_eq!(counter.lines, 24);
    assert_eq!(counter.triangles, 0);
}

#[test]
fn test_traversal_matches_count_law() {
    for depth in 0..=5 {
        let expected = PrimitiveCount::at_depth(depth, true);
        let mut counter = PrimitiveCounter::new();
        render_tetrahedron(&mut counter, &Tetrahedron::PYRAMID, depth, true, &Palette::default());
        assert_eq!(counter.lines as u64, expected.lines);
        assert_eq!(counter.triangles as u64, expected.triangles);
    }
}

// ==================== Depth Clamp Tests ====================

fn frame_counts(requested: i64) -> (usize, usize) {
    let settings = SceneSettings::default().with_requested_depth(requested);
    let state = SceneState::new(&settings);
    let mut counter = PrimitiveCounter::new();
    draw_scene(&mut counter, &state, &settings);
    (counter.lines, counter.triangles)
}

#[test]
fn test_depth_above_ceiling_behaves_like_ceiling() {
    assert_eq!(frame_counts(7), frame_counts(6));
    assert_eq!(frame_counts(1_000), frame_counts(6));
    assert_eq!(frame_counts(6), (6 * 4usize.pow(6), 0));
}

#[test]
fn test_negative_depth_clamps_to_zero() {
    assert_eq!(frame_counts(-1), frame_counts(0));
    assert_eq!(frame_counts(0), (6, 4));
}

#[test]
fn test_face_painting_cannot_be_forced_when_deep() {
    let settings = SceneSettings::default().with_requested_depth(5);
    let mut state = SceneState::new(&settings);
    // even a hand-edited state cannot paint above the threshold
    state.paint_faces = true;
    let state = state.apply(&settings, SceneEvent::TogglePyramidRotation);

    let mut counter = PrimitiveCounter::new();
    draw_scene(&mut counter, &state, &settings);
    assert_eq!(counter.triangles, 0);
}
