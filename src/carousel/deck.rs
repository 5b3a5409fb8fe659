use anyhow::ensure;

use crate::constants::*;
use crate::timer::Interval;

/// Depth slot a visible card occupies, derived purely from its offset to the
/// active index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    FarExit,
    NearTop,
    Center,
    NearBottom,
    FarEnter,
}

impl Slot {
    pub fn from_offset(offset: i64) -> Self {
        match offset {
            0 => Slot::Center,
            -1 => Slot::NearTop,
            1 => Slot::NearBottom,
            o if o < -1 => Slot::FarExit,
            _ => Slot::FarEnter,
        }
    }

    /// Declarative target parameters for this slot. The rendering engine
    /// animates toward these; the table itself is the whole contract.
    pub fn style(self) -> SlotStyle {
        match self {
            Slot::FarExit => SlotStyle {
                opacity: 0.0,
                scale: 0.55,
                shift_y: -0.42,
                blur: 1.0,
                layer: 0,
            },
            Slot::NearTop => SlotStyle {
                opacity: 0.65,
                scale: 0.75,
                shift_y: -0.28,
                blur: 0.4,
                layer: 1,
            },
            Slot::Center => SlotStyle {
                opacity: 1.0,
                scale: 1.0,
                shift_y: 0.0,
                blur: 0.0,
                layer: 2,
            },
            Slot::NearBottom => SlotStyle {
                opacity: 0.65,
                scale: 0.75,
                shift_y: 0.28,
                blur: 0.4,
                layer: 1,
            },
            Slot::FarEnter => SlotStyle {
                opacity: 0.0,
                scale: 0.55,
                shift_y: 0.42,
                blur: 1.0,
                layer: 0,
            },
        }
    }
}

/// Visual parameters for one depth slot. `shift_y` is a fraction of the
/// container height relative to its center; `layer` orders drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotStyle {
    pub opacity: f32,
    pub scale: f32,
    pub shift_y: f32,
    pub blur: f32,
    pub layer: i32,
}

impl SlotStyle {
    pub fn lerp(from: SlotStyle, to: SlotStyle, t: f32) -> SlotStyle {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        SlotStyle {
            opacity: mix(from.opacity, to.opacity),
            scale: mix(from.scale, to.scale),
            shift_y: mix(from.shift_y, to.shift_y),
            blur: mix(from.blur, to.blur),
            layer: to.layer,
        }
    }
}

/// A card of the visible window, recomputed fresh every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleCard {
    pub offset: i64,
    pub image_index: usize,
    pub slot: Slot,
}

/// The depth carousel: one monotonic counter and a cycle timer.
///
/// No per-card state survives a tick; the visible window is a pure function
/// of `active_index`, so there is nothing to drift or leak.
pub struct Deck {
    active_index: i64,
    catalog_len: usize,
    cycle: Interval,
}

impl Deck {
    pub fn new(catalog_len: usize) -> anyhow::Result<Self> {
        ensure!(catalog_len > 0, "carousel needs a non-empty catalog");
        let mut cycle = Interval::new(CYCLE_PERIOD);
        cycle.start();
        Ok(Self {
            active_index: 0,
            catalog_len,
            cycle,
        })
    }

    pub fn active_index(&self) -> i64 {
        self.active_index
    }

    /// Advances the cycle timer; returns how many steps fired this frame.
    pub fn tick(&mut self, dt: f32) -> u32 {
        let fired = self.cycle.advance(dt);
        for _ in 0..fired {
            self.advance();
        }
        fired
    }

    /// One unconditional step forward. The index never wraps; wrapping
    /// happens at catalog lookup only.
    pub fn advance(&mut self) {
        self.active_index += 1;
    }

    /// The five cards around the active index, offsets -2..=+2.
    pub fn visible(&self) -> [VisibleCard; 5] {
        std::array::from_fn(|i| {
            let offset = i as i64 - 2;
            VisibleCard {
                offset,
                image_index: self.resolve(self.active_index + offset),
                slot: Slot::from_offset(offset),
            }
        })
    }

    pub fn resolve(&self, index: i64) -> usize {
        index.rem_euclid(self.catalog_len as i64) as usize
    }

    /// Stops the cycle timer on teardown.
    pub fn stop(&mut self) {
        self.cycle.stop();
    }
}
