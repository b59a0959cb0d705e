use std::f32::consts::TAU;

/// Periodic ramp with unit phase.
///
/// The phase climbs linearly from 0 towards 1 at `frequency` cycles per
/// second and wraps back to 0. Waveform accessors map the phase onto
/// oscillating shapes for driving scene motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseRamp {
    phase: f32,
    frequency: f32,
}

impl Default for PhaseRamp {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseRamp {
    pub fn new() -> Self {
        Self {
            phase: 0.0,
            frequency: 1.0,
        }
    }

    pub fn with_frequency(hz: f32) -> Self {
        Self {
            phase: 0.0,
            frequency: hz,
        }
    }

    /// Cycles per second. Negative values run the ramp backward.
    pub fn set_frequency(&mut self, hz: f32) -> &mut Self {
        self.frequency = hz;
        self
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Seconds per cycle. `seconds` must be non-zero.
    pub fn set_period(&mut self, seconds: f32) -> &mut Self {
        self.set_frequency(1.0 / seconds)
    }

    /// Raw phase; not wrapped until the next `advance`.
    pub fn set_phase(&mut self, phase: f32) -> &mut Self {
        self.phase = phase;
        self
    }

    /// Move the phase forward by `frequency * dt` and wrap into [0, 1).
    ///
    /// Uses a Euclidean remainder so backward playback also lands in [0, 1).
    pub fn advance(&mut self, dt: f32) -> &mut Self {
        let wrapped = (self.phase + self.frequency * dt).rem_euclid(1.0);
        // rem_euclid rounds tiny negative values up to exactly 1.0
        self.phase = if wrapped >= 1.0 { 0.0 } else { wrapped };
        self
    }

    pub fn phase_unit(&self) -> f32 {
        self.phase
    }

    pub fn phase_radians(&self) -> f32 {
        self.phase * TAU
    }

    /// Symmetric triangle in [0, 1], peaking at phase 0.5.
    pub fn triangle_wave(&self) -> f32 {
        1.0 - (2.0 * self.phase - 1.0).abs()
    }

    /// Inverted parabola in [0, 1]. Same zeros and peak as the triangle but smooth.
    pub fn parabolic_wave(&self) -> f32 {
        let saw = 2.0 * self.phase - 1.0;
        1.0 - saw * saw
    }

    /// Sine of the phase angle, in [-1, 1].
    pub fn sine_wave(&self) -> f32 {
        self.phase_radians().sin()
    }
}
