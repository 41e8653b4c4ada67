//! One frame of drawing commands

use sierpinski_math::Vec3;

use crate::lighting::LightRig;
use crate::settings::SceneSettings;
use crate::state::SceneState;
use crate::surface::Renderer;
use crate::traversal::render_tetrahedron;

/// Scale applied to the unit indicator sphere
const INDICATOR_SCALE: f32 = 0.1;

/// Issue every drawing command for one frame.
///
/// Order: lights, the rotated pyramid, the ground, the light indicator.
/// The transform stack is balanced on return.
pub fn draw_scene<R: Renderer + ?Sized>(
    renderer: &mut R,
    state: &SceneState,
    settings: &SceneSettings,
) {
    let rig = LightRig::new(state, settings);
    renderer.configure_lights(&rig);

    renderer.push_matrix();
    renderer.rotate(state.pyramid_angle, Vec3::Y);
    render_tetrahedron(
        renderer,
        &settings.base,
        settings.depth,
        state.paint_faces && settings.face_painting_allowed(),
        &settings.palette,
    );
    renderer.pop_matrix();

    renderer.draw_ground();

    let (position, color) = rig.indicator();
    renderer.push_matrix();
    renderer.translate(position);
    renderer.scale(Vec3::new(INDICATOR_SCALE, INDICATOR_SCALE, INDICATOR_SCALE));
    renderer.draw_light_indicator(color);
    renderer.pop_matrix();
}
