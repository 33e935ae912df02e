//! Frame clock

/// Tracks frame deltas and total elapsed time
#[derive(Debug, Default)]
pub struct GameClock {
    /// Total elapsed game time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Number of frames advanced so far
    pub frame_count: u64,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by an explicit delta; negative deltas count as zero
    pub fn advance(&mut self, elapsed: f64) {
        self.delta_time = elapsed.max(0.0);
        self.total_time += self.delta_time;
        self.frame_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_defaults() {
        let clock = GameClock::new();
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.frame_count, 0);
    }

    #[test]
    fn test_advance_accumulates() {
        let mut clock = GameClock::new();
        clock.advance(0.1);
        clock.advance(0.1);
        assert!((clock.total_time - 0.2).abs() < 1e-12);
        assert_eq!(clock.frame_count, 2);
    }

    #[test]
    fn test_advance_keeps_explicit_delta() {
        let mut clock = GameClock::new();
        clock.advance(3.0);
        assert_eq!(clock.delta_time, 3.0);
        clock.advance(-1.0);
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.total_time, 3.0);
    }
}
