pub mod phase_ramp;

pub use phase_ramp::PhaseRamp;

use crate::config::AnimationConfig;

/// Motion values sampled once per frame and fed to the compositor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SceneMotion {
    /// Vertical offset of the cut slice and the knife riding on it.
    pub slice_lift: f32,
    /// Sideways offset of the candle flames.
    pub flame_wobble: f32,
}

/// Owns the ramps that time scene motion.
///
/// `advance` must run at most once per frame; calling it twice double-advances.
pub struct SceneClock {
    slice: PhaseRamp,
    wobble: PhaseRamp,
    time_scale: f32,
    slice_height: f32,
    wobble_amplitude: f32,
}

impl SceneClock {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            slice: PhaseRamp::with_frequency(config.slice_frequency),
            wobble: PhaseRamp::with_frequency(config.wobble_frequency),
            time_scale: config.time_scale,
            slice_height: config.slice_lift,
            wobble_amplitude: config.wobble_amplitude,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        // The slice drifts on scaled time; the flames flicker in real time.
        self.slice.advance(dt * self.time_scale);
        self.wobble.advance(dt);
    }

    pub fn sample(&self) -> SceneMotion {
        SceneMotion {
            slice_lift: self.slice.parabolic_wave() * self.slice_height,
            flame_wobble: self.wobble.sine_wave() * self.wobble_amplitude,
        }
    }

    pub fn slice_ramp(&self) -> &PhaseRamp {
        &self.slice
    }
}
