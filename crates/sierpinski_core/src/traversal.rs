//! Recursive Sierpinski traversal
//!
//! Interior levels only subdivide; leaves emit their 6 edges and, when face
//! painting is on, their 4 shaded faces. Geometry comes from
//! `sierpinski_math`, drawing goes to the [`DrawSurface`]; the two are never
//! mixed in one function.

use sierpinski_math::{face_normal, subdivide, Tetrahedron, EDGES, FACES};

use crate::settings::Palette;
use crate::surface::{DrawSurface, Topology};

/// Draw `tetra` subdivided `remaining_depth` more times.
///
/// Emits exactly `6 * 4^remaining_depth` line segments, plus
/// `4 * 4^remaining_depth` triangles when `paint_faces` is set. Recursion
/// depth equals `remaining_depth`, which callers clamp beforehand.
pub fn render_tetrahedron<S: DrawSurface + ?Sized>(
    surface: &mut S,
    tetra: &Tetrahedron,
    remaining_depth: u32,
    paint_faces: bool,
    palette: &Palette,
) {
    if remaining_depth == 0 {
        emit_edges(surface, tetra, palette);
        if paint_faces {
            emit_faces(surface, tetra, palette);
        }
        return;
    }

    for child in subdivide(tetra) {
        render_tetrahedron(surface, &child, remaining_depth - 1, paint_faces, palette);
    }
}

fn emit_edges<S: DrawSurface + ?Sized>(surface: &mut S, tetra: &Tetrahedron, palette: &Palette) {
    surface.begin(Topology::Lines);
    surface.color(palette.edge_color);
    for [a, b] in EDGES {
        surface.vertex(tetra.vertices[a]);
        surface.vertex(tetra.vertices[b]);
    }
    surface.end();
}

fn emit_faces<S: DrawSurface + ?Sized>(surface: &mut S, tetra: &Tetrahedron, palette: &Palette) {
    surface.begin(Topology::Triangles);
    for face in FACES {
        surface.normal(face_normal(tetra, face));
        for (slot, &index) in face.iter().enumerate() {
            surface.color(palette.face_color(slot));
            surface.vertex(tetra.vertices[index]);
        }
    }
    surface.end();
}
