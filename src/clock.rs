//! Fixed-period tick scheduling, decoupled from the display refresh rate.
//!
//! Frame time is accumulated and converted into whole ticks. Leftover time
//! carries over to the next frame.

#[derive(Debug, Clone, PartialEq)]
pub struct SimClock {
    tick_duration: f32,
    max_ticks_per_frame: u32,
    time_accumulator: f32,
}

impl SimClock {
    pub fn new(tick_duration: f32, max_ticks_per_frame: u32) -> Self {
        SimClock {
            tick_duration,
            max_ticks_per_frame,
            time_accumulator: 0.0,
        }
    }

    /// Time banked toward the next tick, in seconds.
    pub fn accumulated(&self) -> f32 {
        self.time_accumulator
    }

    /// Adds one frame's elapsed time and returns how many ticks are due.
    ///
    /// At most `max_ticks_per_frame` ticks are handed out; the time for any
    /// further ticks is dropped so a stalled frame cannot snowball.
    pub fn accumulate(&mut self, frame_time: f32) -> u32 {
        if frame_time > 0.0 {
            self.time_accumulator += frame_time;
        }

        let mut due = 0;
        while self.time_accumulator >= self.tick_duration {
            self.time_accumulator -= self.tick_duration;
            due += 1;

            if due >= self.max_ticks_per_frame.max(1) {
                if self.time_accumulator >= self.tick_duration {
                    log::warn!(
                        target: "clock",
                        "Frame fell behind by {:.3}s; dropping the backlog",
                        self.time_accumulator
                    );
                    self.time_accumulator %= self.tick_duration;
                }
                break;
            }
        }
        due
    }

    /// Discards banked time. Used while the simulation is paused.
    pub fn reset(&mut self) {
        self.time_accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_whole_ticks_are_due() {
        let mut clock = SimClock::new(0.25, 8);
        assert_eq!(clock.accumulate(1.0), 4);
        assert_approx_eq!(clock.accumulated(), 0.0);
    }

    #[test]
    fn test_remainder_carries_over() {
        let mut clock = SimClock::new(0.25, 8);
        assert_eq!(clock.accumulate(0.625), 2);
        assert_approx_eq!(clock.accumulated(), 0.125);
        assert_eq!(clock.accumulate(0.125), 1);
        assert_approx_eq!(clock.accumulated(), 0.0);
    }

    #[test]
    fn test_short_frames_accumulate() {
        let mut clock = SimClock::new(0.5, 8);
        assert_eq!(clock.accumulate(0.25), 0);
        assert_eq!(clock.accumulate(0.25), 1);
    }

    #[test]
    fn test_backlog_is_capped() {
        let mut clock = SimClock::new(0.25, 3);
        assert_eq!(clock.accumulate(10.125), 3);
        assert!(clock.accumulated() < 0.25);
        assert_eq!(clock.accumulate(0.0), 0);
    }

    #[test]
    fn test_negative_frame_time_is_ignored() {
        let mut clock = SimClock::new(0.25, 8);
        assert_eq!(clock.accumulate(-1.0), 0);
        assert_approx_eq!(clock.accumulated(), 0.0);
    }

    #[test]
    fn test_reset_discards_banked_time() {
        let mut clock = SimClock::new(0.25, 8);
        clock.accumulate(0.125);
        clock.reset();
        assert_eq!(clock.accumulate(0.125), 0);
    }
}
