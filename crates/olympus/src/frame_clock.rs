use chrono::DateTime;
use chrono::Utc;

/// Longest frame step the engine will simulate in one go, in seconds.
pub const MAX_FRAME_STEP: f32 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameTiming {
    /// Every frame advances by the same amount regardless of wall-clock time.
    Fixed { dt: f32 },
    /// Wall-clock time between frames, clamped to `max_step` seconds.
    Measured { max_step: f32 },
}

impl FrameTiming {
    pub fn default_measured() -> Self {
        Self::Measured {
            max_step: MAX_FRAME_STEP,
        }
    }
}

pub struct FrameClock {
    timing: FrameTiming,
    last_tick: Option<DateTime<Utc>>,
    elapsed: f64,
    frame_count: u64,
}

impl FrameClock {
    pub fn new(timing: FrameTiming) -> Self {
        Self {
            timing,
            last_tick: None,
            elapsed: 0.0,
            frame_count: 0,
        }
    }

    /// Seconds to advance the simulation by for this frame.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Utc::now())
    }

    pub fn tick_at(&mut self, now: DateTime<Utc>) -> f32 {
        let dt = match self.timing {
            FrameTiming::Fixed { dt } => dt,
            FrameTiming::Measured { max_step } => match self.last_tick {
                // The first frame has nothing to measure against.
                None => 0.0,
                Some(last) => {
                    let micros = (now - last).num_microseconds().unwrap_or(i64::MAX);
                    (micros.max(0) as f64 / 1_000_000.0).min(max_step as f64) as f32
                }
            },
        };
        self.last_tick = Some(now);
        self.elapsed += dt as f64;
        self.frame_count += 1;
        dt
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
