use rand::Rng;

use crate::constants::*;

/// Container geometry the pool lays cards out in (pixels).
#[derive(Debug, Clone, Copy)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

/// Per-card drift parameters, rolled once when a card enters the pool.
///
/// Each axis oscillates back and forth between its min/max bound. The
/// durations govern the oscillation period and the delays phase-offset the
/// start, so five cards rolled from the same container still move out of
/// sync. The interpolation curve itself lives in the rendering engine.
#[derive(Debug, Clone, Copy)]
pub struct MotionParams {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub duration_x: f32,
    pub duration_y: f32,
    pub delay_x: f32,
    pub delay_y: f32,
}

impl MotionParams {
    pub fn generate(container: Extent, rng: &mut impl Rng) -> Self {
        let min_x = BUFFER_X;
        let max_x = (container.width - CARD_WIDTH - BUFFER_X).max(min_x);
        let min_y = BUFFER_TOP;
        let max_y = (container.height - CARD_EST_HEIGHT - BUFFER_BOTTOM).max(min_y);

        // The max() clamps keep the range valid on tiny containers, trading
        // buffer overlap for never producing an inverted range.

        let duration_x = rng.random_range(DRIFT_DURATION_MIN..DRIFT_DURATION_MAX);
        let duration_y = rng.random_range(DRIFT_DURATION_MIN..DRIFT_DURATION_MAX);
        let delay_x = rng.random_range(0.0..2.0 * duration_x);
        let delay_y = rng.random_range(0.0..2.0 * duration_y);

        Self {
            min_x,
            max_x,
            min_y,
            max_y,
            duration_x,
            duration_y,
            delay_x,
            delay_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn bounds_respect_buffers_on_a_large_container() {
        let container = Extent {
            width: 2000.0,
            height: 1200.0,
        };
        let mut rng = StdRng::seed_from_u64(42);
        let motion = MotionParams::generate(container, &mut rng);

        assert_eq!(motion.min_x, BUFFER_X);
        assert_eq!(motion.max_x, 2000.0 - CARD_WIDTH - BUFFER_X);
        assert_eq!(motion.min_y, BUFFER_TOP);
        assert_eq!(motion.max_y, 1200.0 - CARD_EST_HEIGHT - BUFFER_BOTTOM);
        assert!(motion.max_x > motion.min_x);
        assert!(motion.max_y > motion.min_y);
    }

    #[test]
    fn clamp_engages_when_container_matches_card_width() {
        let container = Extent {
            width: CARD_WIDTH,
            height: 100.0,
        };
        let mut rng = StdRng::seed_from_u64(42);
        let motion = MotionParams::generate(container, &mut rng);

        // Never an inverted range, even when the card fills the container.
        assert_eq!(motion.max_x, motion.min_x);
        assert_eq!(motion.max_y, motion.min_y);
    }

    #[test]
    fn zero_size_container_degrades_instead_of_failing() {
        let container = Extent {
            width: 0.0,
            height: 0.0,
        };
        let mut rng = StdRng::seed_from_u64(3);
        let motion = MotionParams::generate(container, &mut rng);
        assert_eq!(motion.max_x, motion.min_x);
        assert_eq!(motion.max_y, motion.min_y);
    }

    #[test]
    fn durations_and_delays_land_in_their_ranges() {
        let container = Extent {
            width: 2000.0,
            height: 1200.0,
        };
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let m = MotionParams::generate(container, &mut rng);
            assert!(m.duration_x >= DRIFT_DURATION_MIN && m.duration_x < DRIFT_DURATION_MAX);
            assert!(m.duration_y >= DRIFT_DURATION_MIN && m.duration_y < DRIFT_DURATION_MAX);
            assert!(m.delay_x >= 0.0 && m.delay_x < 2.0 * m.duration_x);
            assert!(m.delay_y >= 0.0 && m.delay_y < 2.0 * m.duration_y);
        }
    }
}
