//! Per-frame scene update
//!
//! Input handlers queue [`SceneEvent`]s as they arrive. Once per frame
//! [`FrameSystem::update`] drains the queue through [`SceneState::apply`] and
//! then advances the animation, so a frame always sees a consistent state.

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use sierpinski_core::{SceneEvent, SceneSettings, SceneState};

/// Owns the scene state and the pending input queue
pub struct FrameSystem {
    settings: SceneSettings,
    state: SceneState,
    pending: VecDeque<SceneEvent>,
    frame_delay: Duration,
    last_frame: Instant,
    frame_count: u64,
}

impl FrameSystem {
    /// Create a frame system with the initial state for `settings`
    pub fn new(settings: SceneSettings, frame_delay: Duration) -> Self {
        let state = SceneState::new(&settings);
        Self {
            settings,
            state,
            pending: VecDeque::new(),
            frame_delay,
            last_frame: Instant::now(),
            frame_count: 0,
        }
    }

    /// Queue an input event for the next frame
    pub fn queue(&mut self, event: SceneEvent) {
        log::debug!("Queued {:?}", event);
        self.pending.push_back(event);
    }

    /// Number of events waiting for the next frame
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Apply queued input, then advance the animation by one frame
    pub fn update(&mut self) -> &SceneState {
        while let Some(event) = self.pending.pop_front() {
            let before = self.state;
            self.state = self.state.apply(&self.settings, event);
            log_transition(&before, &self.state, &self.settings, event);
        }

        self.state = self.state.advance(&self.settings);
        self.frame_count += 1;
        &self.state
    }

    /// Record that a frame was presented at `now`
    pub fn mark_presented(&mut self, now: Instant) {
        self.last_frame = now;
    }

    /// Earliest time the next frame should start
    pub fn next_frame_at(&self) -> Instant {
        self.last_frame + self.frame_delay
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    /// Frames updated so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

fn log_transition(before: &SceneState, after: &SceneState, settings: &SceneSettings, event: SceneEvent) {
    match event {
        SceneEvent::TogglePyramidRotation => {
            log::info!("Pyramid rotation: {}", on_off(after.pyramid_rotating));
        }
        SceneEvent::ToggleLightRotation => {
            log::info!("Light rotation: {}", on_off(after.light_rotating));
        }
        SceneEvent::ToggleFacePainting => {
            if !before.paint_faces && !after.paint_faces {
                log::info!(
                    "Face painting unavailable at depth {} (max {})",
                    settings.depth,
                    settings.paint_faces_max_depth
                );
            } else {
                log::info!("Face painting: {}", on_off(after.paint_faces));
            }
        }
        SceneEvent::CycleLightMode => {
            log::info!("Light mode: {:?}", after.light_mode);
        }
        SceneEvent::SetLightColor(preset) => {
            if before.light_color == after.light_color && settings.light_color_presets.get(preset).is_none() {
                log::warn!("No light color preset {}", preset);
            } else {
                log::info!("Light color: {:?}", after.light_color);
            }
        }
        SceneEvent::NudgeLight { .. } => {
            log::debug!("Light direction: {:?}", after.light_direction);
        }
        SceneEvent::Pan(_) | SceneEvent::Zoom(_) => {
            log::debug!("Camera offset: {:?}", after.camera_offset);
        }
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}
