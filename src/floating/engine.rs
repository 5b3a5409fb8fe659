use std::collections::HashMap;

use raylib::prelude::*;

use crate::catalog::Catalog;
use crate::constants::*;
use crate::engine::Engine;
use crate::floating::motion::{Extent, MotionParams};
use crate::floating::pool::{Card, CardId, CardStatus, Pool, PoolEvent};
use crate::texture_loader::load_catalog_textures;

/// Animation executor for the floating wall.
///
/// The pool decides *what* each card is (floating, spotlighted, exiting);
/// this engine decides what that looks like, runs the tweens, and reports
/// exit completions back so the pool can recycle.
pub struct FloatingEngine {
    catalog: Option<Catalog>,
    textures: Vec<Option<Texture2D>>,
    pool: Option<Pool>,
    visuals: HashMap<CardId, Visual>,
    clock: f32,
}

/// Per-card presentation state, keyed by the pool's card id and dropped when
/// the card leaves the pool.
struct Visual {
    born: f32,
    mode: VisualMode,
    x: f32,
    y: f32,
    scale: f32,
    alpha: f32,
}

enum VisualMode {
    Drifting,
    SpotlightEnter {
        tween_x: ease::Tween,
        tween_y: ease::Tween,
        tween_scale: ease::Tween,
        timer: f32,
    },
    SpotlightHold,
    Exiting {
        tween_scale: ease::Tween,
        tween_alpha: ease::Tween,
        timer: f32,
    },
}

/// Mirrored oscillation between `min` and `max` with period `2 * duration`;
/// the delay phase-offsets the sweep. The cosine keeps the turnarounds soft.
fn oscillate(min: f32, max: f32, duration: f32, delay: f32, t: f32) -> f32 {
    if max <= min {
        return min;
    }
    let phase = (t + delay) / duration * std::f32::consts::PI;
    min + (max - min) * (0.5 - 0.5 * phase.cos())
}

fn drift_position(motion: &MotionParams, t: f32) -> (f32, f32) {
    (
        oscillate(motion.min_x, motion.max_x, motion.duration_x, motion.delay_x, t),
        oscillate(motion.min_y, motion.max_y, motion.duration_y, motion.delay_y, t),
    )
}

impl FloatingEngine {
    pub fn new() -> Self {
        Self {
            catalog: None,
            textures: Vec::new(),
            pool: None,
            visuals: HashMap::new(),
            clock: 0.0,
        }
    }

    /// Drawn height of a card at base scale, falling back to the estimate
    /// when the texture failed to load.
    fn card_height(texture: Option<&Texture2D>) -> f32 {
        match texture {
            Some(tex) if tex.width() > 0 => CARD_WIDTH * tex.height() as f32 / tex.width() as f32,
            _ => CARD_EST_HEIGHT,
        }
    }
}

impl Engine for FloatingEngine {
    fn initialize(
        &mut self,
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        catalog: Catalog,
    ) -> anyhow::Result<()> {
        self.textures = load_catalog_textures(rl, thread, &catalog);

        let container = Extent {
            width: RENDER_WIDTH as f32,
            height: RENDER_HEIGHT as f32,
        };
        let mut rng = rand::rng();
        self.pool = Some(Pool::new(&catalog, container, &mut rng)?);
        self.catalog = Some(catalog);
        Ok(())
    }

    fn render_frame(
        &mut self,
        dt: f32,
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        framebuffer: &mut RenderTexture2D,
    ) {
        let Some(pool) = self.pool.as_mut() else {
            return;
        };
        let Some(catalog) = self.catalog.as_ref() else {
            return;
        };
        let mut rng = rand::rng();

        self.clock += dt;
        pool.tick(dt, &mut rng);

        // Attach visuals to cards the pool created since last frame and
        // react to status changes the pool made this tick.
        for card in pool.cards() {
            let visual = self.visuals.entry(card.id).or_insert_with(|| {
                let (x, y) = drift_position(&card.motion, 0.0);
                Visual {
                    born: self.clock,
                    mode: VisualMode::Drifting,
                    x,
                    y,
                    scale: 1.0,
                    alpha: 1.0,
                }
            });

            match card.status {
                CardStatus::Spotlight => {
                    if matches!(visual.mode, VisualMode::Drifting) {
                        let texture = self.textures[card.image_index].as_ref();
                        let height = Self::card_height(texture);
                        let target_x = (RENDER_WIDTH as f32 - CARD_WIDTH * SPOTLIGHT_SCALE) / 2.0;
                        let target_y = (RENDER_HEIGHT as f32 - height * SPOTLIGHT_SCALE) / 2.0;
                        visual.mode = VisualMode::SpotlightEnter {
                            tween_x: ease::Tween::new(
                                ease::cubic_out,
                                visual.x,
                                target_x,
                                SPOTLIGHT_ENTER_DURATION,
                            ),
                            tween_y: ease::Tween::new(
                                ease::cubic_out,
                                visual.y,
                                target_y,
                                SPOTLIGHT_ENTER_DURATION,
                            ),
                            tween_scale: ease::Tween::new(
                                ease::cubic_out,
                                visual.scale,
                                SPOTLIGHT_SCALE,
                                SPOTLIGHT_ENTER_DURATION,
                            ),
                            timer: 0.0,
                        };
                    }
                }
                CardStatus::Exiting => {
                    if !matches!(visual.mode, VisualMode::Exiting { .. }) {
                        visual.mode = VisualMode::Exiting {
                            tween_scale: ease::Tween::new(
                                ease::back_in,
                                visual.scale,
                                0.0,
                                SPOTLIGHT_EXIT_DURATION,
                            ),
                            tween_alpha: ease::Tween::new(
                                ease::linear_none,
                                visual.alpha,
                                0.0,
                                SPOTLIGHT_EXIT_DURATION,
                            ),
                            timer: 0.0,
                        };
                    }
                }
                CardStatus::Floating => {}
            }
        }

        // Advance every visual and collect finished exits.
        let mut completed: Vec<CardId> = Vec::new();
        for card in pool.cards() {
            let Some(visual) = self.visuals.get_mut(&card.id) else {
                continue;
            };
            let mut enter_finished = false;
            match &mut visual.mode {
                VisualMode::Drifting => {
                    let drift_age = self.clock - visual.born;
                    let (x, y) = drift_position(&card.motion, drift_age);
                    visual.x = x;
                    visual.y = y;
                    visual.scale = 1.0;
                    visual.alpha = 1.0;
                }
                VisualMode::SpotlightEnter {
                    tween_x,
                    tween_y,
                    tween_scale,
                    timer,
                } => {
                    visual.x = tween_x.apply(dt);
                    visual.y = tween_y.apply(dt);
                    visual.scale = tween_scale.apply(dt);
                    *timer += dt;
                    enter_finished = *timer >= SPOTLIGHT_ENTER_DURATION;
                }
                VisualMode::SpotlightHold => {}
                VisualMode::Exiting {
                    tween_scale,
                    tween_alpha,
                    timer,
                } => {
                    visual.scale = tween_scale.apply(dt);
                    visual.alpha = tween_alpha.apply(dt);
                    *timer += dt;
                    if *timer >= SPOTLIGHT_EXIT_DURATION {
                        completed.push(card.id);
                    }
                }
            }
            if enter_finished {
                visual.mode = VisualMode::SpotlightHold;
            }
        }

        // Completion signals drive recycling; the pool decides what replaces
        // the retired card.
        for card in completed {
            pool.handle(
                PoolEvent::AnimationCompleted {
                    card,
                    from: CardStatus::Exiting,
                },
                catalog,
                &mut rng,
            );
        }

        // Drop visuals whose cards are gone.
        let live: Vec<CardId> = pool.cards().iter().map(|c| c.id).collect();
        self.visuals.retain(|id, _| live.contains(id));

        // Draw floating cards first, the exiting card above them, and the
        // spotlighted card on top.
        let mut order: Vec<&Card> = pool.cards().iter().collect();
        order.sort_by_key(|c| match c.status {
            CardStatus::Floating => 0,
            CardStatus::Exiting => 1,
            CardStatus::Spotlight => 2,
        });

        rl.draw_texture_mode(thread, framebuffer, |mut tmd| {
            let mut d = tmd.begin_drawing(thread);
            d.clear_background(Color::BLACK);

            for card in &order {
                let Some(texture) = self.textures[card.image_index].as_ref() else {
                    continue;
                };
                let Some(visual) = self.visuals.get(&card.id) else {
                    continue;
                };

                let width = CARD_WIDTH * visual.scale;
                let height = Self::card_height(Some(texture)) * visual.scale;

                d.draw_texture_pro(
                    texture,
                    Rectangle::new(0.0, 0.0, texture.width() as f32, texture.height() as f32),
                    Rectangle::new(visual.x, visual.y, width, height),
                    Vector2::new(0.0, 0.0),
                    0.0,
                    Color::WHITE.fade(visual.alpha),
                );
            }
        });
    }

    fn shutdown(&mut self) {
        if let Some(pool) = self.pool.as_mut() {
            pool.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oscillation_stays_within_bounds() {
        let mut t = 0.0;
        while t < 200.0 {
            let v = oscillate(40.0, 1600.0, 27.5, 13.0, t);
            assert!((40.0..=1600.0).contains(&v));
            t += 0.37;
        }
    }

    #[test]
    fn oscillation_collapses_to_min_on_degenerate_range() {
        assert_eq!(oscillate(40.0, 40.0, 25.0, 0.0, 12.3), 40.0);
        assert_eq!(oscillate(40.0, 10.0, 25.0, 0.0, 12.3), 40.0);
    }

    #[test]
    fn oscillation_mirrors_after_one_duration() {
        // At t = 0 with no delay the sweep starts at min; one duration later
        // it has reached max, and after two it is back at min.
        let v0 = oscillate(0.0, 100.0, 20.0, 0.0, 0.0);
        let v1 = oscillate(0.0, 100.0, 20.0, 0.0, 20.0);
        let v2 = oscillate(0.0, 100.0, 20.0, 0.0, 40.0);
        assert!((v0 - 0.0).abs() < 1e-3);
        assert!((v1 - 100.0).abs() < 1e-3);
        assert!((v2 - 0.0).abs() < 1e-3);
    }
}
