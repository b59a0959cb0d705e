use std::time::Instant;

/// Upper bound on `dt` in seconds. After a stall such as a debugger pause or a
/// window drag, the next frame advances the slice ramp by at most this much
/// instead of skipping whole lift cycles.
const MAX_DT: f32 = 0.25;

pub struct FrameTimer {
    last: Instant,
    pub dt: f32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            dt: 0.0,
        }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.dt = now.duration_since(self.last).as_secs_f32().min(MAX_DT);
        self.last = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn stalled_frame_is_clamped() {
        let mut timer = FrameTimer::new();
        timer.last = Instant::now().checked_sub(Duration::from_secs(3)).unwrap();
        timer.tick();
        assert_eq!(timer.dt, MAX_DT);
    }
}
