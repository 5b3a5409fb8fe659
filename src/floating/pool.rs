use anyhow::Context;
use rand::Rng;

use crate::catalog::Catalog;
use crate::constants::*;
use crate::floating::motion::{Extent, MotionParams};
use crate::timer::Interval;

pub type CardId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStatus {
    Floating,
    Spotlight,
    Exiting,
}

/// One card of the floating wall.
#[derive(Debug, Clone)]
pub struct Card {
    pub id: CardId,
    pub image_index: usize,
    pub status: CardStatus,
    pub motion: MotionParams,
    spotlight_elapsed: f32,
}

/// Completion signals delivered by the animation layer.
///
/// The pool never assumes a transition finished synchronously; it reacts only
/// when the renderer reports completion for a specific card.
#[derive(Debug, Clone, Copy)]
pub enum PoolEvent {
    AnimationCompleted { card: CardId, from: CardStatus },
}

/// The floating wall state machine.
///
/// Holds exactly `MAX_CARDS` cards. A recurring check promotes one floating
/// card to the spotlight when none is held; the spotlighted card carries its
/// own hold timer armed at promotion, moves to `Exiting` when it runs out,
/// and is replaced by a fresh card once the renderer reports its exit
/// animation done.
pub struct Pool {
    cards: Vec<Card>,
    next_id: CardId,
    container: Extent,
    spotlight_check: Interval,
}

impl Pool {
    /// Populates the pool with `MAX_CARDS` distinct images and fresh motion
    /// parameters. Fails fast when the catalog is too small to satisfy
    /// distinctness.
    pub fn new(catalog: &Catalog, container: Extent, rng: &mut impl Rng) -> anyhow::Result<Self> {
        let images = catalog
            .random_distinct(MAX_CARDS, rng)
            .context("cannot seed the floating wall")?;

        let mut pool = Self {
            cards: Vec::with_capacity(MAX_CARDS),
            next_id: 0,
            container,
            spotlight_check: Interval::new(SPOTLIGHT_CHECK_PERIOD),
        };
        for image_index in images {
            pool.spawn_card(image_index, rng);
        }
        pool.spotlight_check.start();
        Ok(pool)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn spotlighted(&self) -> Option<&Card> {
        self.cards.iter().find(|c| c.status == CardStatus::Spotlight)
    }

    /// Advances timers: runs the periodic spotlight check and the hold timer
    /// of the spotlighted card, if any. Both are no-ops when nothing is due.
    pub fn tick(&mut self, dt: f32, rng: &mut impl Rng) {
        let mut promoted = None;
        for _ in 0..self.spotlight_check.advance(dt) {
            if let Some(id) = self.try_promote(rng) {
                promoted = Some(id);
            }
        }

        // The hold timer belongs to the card, armed at promotion; it is not
        // synchronized with the periodic check above. A card promoted by
        // this very call starts holding at zero and is not charged for the
        // frame that promoted it.
        for card in &mut self.cards {
            if card.status == CardStatus::Spotlight && promoted != Some(card.id) {
                card.spotlight_elapsed += dt;
                if card.spotlight_elapsed >= SPOTLIGHT_HOLD {
                    card.status = CardStatus::Exiting;
                }
            }
        }
    }

    /// Reacts to a completion signal from the animation layer. A finished
    /// exit removes the card and synthesizes a floating replacement, keeping
    /// the pool size constant. Stale or unknown signals are ignored.
    pub fn handle(&mut self, event: PoolEvent, catalog: &Catalog, rng: &mut impl Rng) {
        match event {
            PoolEvent::AnimationCompleted { card, from } => {
                if from != CardStatus::Exiting {
                    return;
                }
                let Some(pos) = self
                    .cards
                    .iter()
                    .position(|c| c.id == card && c.status == CardStatus::Exiting)
                else {
                    return;
                };
                let _ = self.cards.remove(pos);
                // The replacement image is a plain uniform draw; only the
                // initial fill enforces distinctness.
                let image_index = catalog.random_index(rng);
                self.spawn_card(image_index, rng);
            }
        }
    }

    /// Stops the recurring check. Call on teardown so nothing fires into a
    /// disposed pool.
    pub fn stop(&mut self) {
        self.spotlight_check.stop();
    }

    fn try_promote(&mut self, rng: &mut impl Rng) -> Option<CardId> {
        if self.cards.iter().any(|c| c.status == CardStatus::Spotlight) {
            return None;
        }
        let floating: Vec<usize> = self
            .cards
            .iter()
            .enumerate()
            .filter(|(_, c)| c.status == CardStatus::Floating)
            .map(|(i, _)| i)
            .collect();
        if floating.is_empty() {
            return None;
        }
        let pick = floating[rng.random_range(0..floating.len())];
        let card = &mut self.cards[pick];
        card.status = CardStatus::Spotlight;
        card.spotlight_elapsed = 0.0;
        Some(card.id)
    }

    fn spawn_card(&mut self, image_index: usize, rng: &mut impl Rng) {
        let id = self.next_id;
        self.next_id += 1;
        self.cards.push(Card {
            id,
            image_index,
            status: CardStatus::Floating,
            motion: MotionParams::generate(self.container, rng),
            spotlight_elapsed: 0.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::path::PathBuf;

    fn test_catalog(n: usize) -> Catalog {
        Catalog::from_paths((1..=n).map(|i| PathBuf::from(format!("card_{i}.png"))).collect())
            .unwrap()
    }

    fn test_container() -> Extent {
        Extent {
            width: 2000.0,
            height: 1200.0,
        }
    }

    fn spotlight_count(pool: &Pool) -> usize {
        pool.cards()
            .iter()
            .filter(|c| c.status == CardStatus::Spotlight)
            .count()
    }

    #[test]
    fn seeds_the_pool_with_distinct_images() {
        let catalog = test_catalog(74);
        let mut rng = StdRng::seed_from_u64(11);
        let pool = Pool::new(&catalog, test_container(), &mut rng).unwrap();

        assert_eq!(pool.cards().len(), MAX_CARDS);
        assert!(pool.cards().iter().all(|c| c.status == CardStatus::Floating));

        let mut images: Vec<usize> = pool.cards().iter().map(|c| c.image_index).collect();
        images.sort_unstable();
        images.dedup();
        assert_eq!(images.len(), MAX_CARDS, "initial images must be distinct");
    }

    #[test]
    fn fails_fast_when_pool_exceeds_catalog() {
        let catalog = test_catalog(MAX_CARDS - 1);
        let mut rng = StdRng::seed_from_u64(11);
        assert!(Pool::new(&catalog, test_container(), &mut rng).is_err());
    }

    #[test]
    fn never_holds_more_than_one_spotlight() {
        let catalog = test_catalog(74);
        let mut rng = StdRng::seed_from_u64(5);
        let mut pool = Pool::new(&catalog, test_container(), &mut rng).unwrap();

        // Run many check periods without ever completing an exit; repeated
        // checks must not stack spotlights.
        for _ in 0..10 {
            pool.tick(SPOTLIGHT_CHECK_PERIOD, &mut rng);
            assert!(spotlight_count(&pool) <= 1);
            assert_eq!(pool.cards().len(), MAX_CARDS);
        }
    }

    #[test]
    fn check_tick_is_a_noop_while_a_card_is_spotlighted() {
        let catalog = test_catalog(74);
        let mut rng = StdRng::seed_from_u64(5);
        let mut pool = Pool::new(&catalog, test_container(), &mut rng).unwrap();

        // Two check periods caught up in a single frame: the first fires and
        // promotes, the second fires while that card is still held and must
        // not stack a second spotlight.
        pool.tick(2.0 * SPOTLIGHT_CHECK_PERIOD, &mut rng);
        assert_eq!(spotlight_count(&pool), 1);
    }

    #[test]
    fn promoting_tick_does_not_consume_hold_time() {
        let catalog = test_catalog(74);
        let mut rng = StdRng::seed_from_u64(5);
        let mut pool = Pool::new(&catalog, test_container(), &mut rng).unwrap();

        // The check period exceeds the hold, so if the promoting frame's dt
        // were charged against the hold timer the card would exit within the
        // same tick it was promoted.
        pool.tick(SPOTLIGHT_CHECK_PERIOD, &mut rng);
        let holder = pool
            .spotlighted()
            .expect("card promoted this tick must still be held")
            .id;

        // The hold clock starts at promotion: just under a full hold later
        // the same card is still spotlighted.
        pool.tick(SPOTLIGHT_HOLD - 0.1, &mut rng);
        assert_eq!(pool.spotlighted().map(|c| c.id), Some(holder));
    }

    #[test]
    fn spotlight_expires_into_exiting_after_hold() {
        let catalog = test_catalog(74);
        let mut rng = StdRng::seed_from_u64(8);
        let mut pool = Pool::new(&catalog, test_container(), &mut rng).unwrap();

        pool.tick(SPOTLIGHT_CHECK_PERIOD, &mut rng);
        let holder = pool.spotlighted().unwrap().id;

        pool.tick(SPOTLIGHT_HOLD - 0.1, &mut rng);
        assert_eq!(pool.spotlighted().map(|c| c.id), Some(holder));

        pool.tick(0.1, &mut rng);
        assert!(pool.spotlighted().is_none());
        let card = pool.cards().iter().find(|c| c.id == holder).unwrap();
        assert_eq!(card.status, CardStatus::Exiting);
    }

    #[test]
    fn completed_exit_recycles_into_a_fresh_floating_card() {
        let catalog = test_catalog(74);
        let mut rng = StdRng::seed_from_u64(8);
        let mut pool = Pool::new(&catalog, test_container(), &mut rng).unwrap();

        pool.tick(SPOTLIGHT_CHECK_PERIOD, &mut rng);
        let holder = pool.spotlighted().unwrap().id;
        pool.tick(SPOTLIGHT_HOLD, &mut rng);

        pool.handle(
            PoolEvent::AnimationCompleted {
                card: holder,
                from: CardStatus::Exiting,
            },
            &catalog,
            &mut rng,
        );

        assert_eq!(pool.cards().len(), MAX_CARDS);
        assert!(pool.cards().iter().all(|c| c.id != holder));
        assert!(pool.cards().iter().all(|c| c.status == CardStatus::Floating));
    }

    #[test]
    fn stale_completion_signals_are_ignored() {
        let catalog = test_catalog(74);
        let mut rng = StdRng::seed_from_u64(21);
        let mut pool = Pool::new(&catalog, test_container(), &mut rng).unwrap();
        let first = pool.cards()[0].id;

        // Card is still floating; an exit-completion for it makes no sense.
        pool.handle(
            PoolEvent::AnimationCompleted {
                card: first,
                from: CardStatus::Exiting,
            },
            &catalog,
            &mut rng,
        );
        assert!(pool.cards().iter().any(|c| c.id == first));

        // Unknown id.
        pool.handle(
            PoolEvent::AnimationCompleted {
                card: 999,
                from: CardStatus::Exiting,
            },
            &catalog,
            &mut rng,
        );
        assert_eq!(pool.cards().len(), MAX_CARDS);

        // Completion of a non-exit transition never recycles.
        pool.handle(
            PoolEvent::AnimationCompleted {
                card: first,
                from: CardStatus::Floating,
            },
            &catalog,
            &mut rng,
        );
        assert!(pool.cards().iter().any(|c| c.id == first));
    }

    #[test]
    fn full_cycle_on_a_2000_by_1200_container() {
        let catalog = test_catalog(74);
        let mut rng = StdRng::seed_from_u64(33);
        let mut pool = Pool::new(&catalog, test_container(), &mut rng).unwrap();
        assert_eq!(pool.cards().len(), 5);

        // First check tick with no prior spotlight: exactly one promotion.
        pool.tick(SPOTLIGHT_CHECK_PERIOD, &mut rng);
        assert_eq!(spotlight_count(&pool), 1);
        let holder = pool.spotlighted().unwrap().id;

        // Exactly the hold duration later the card is exiting.
        pool.tick(SPOTLIGHT_HOLD, &mut rng);
        let card = pool.cards().iter().find(|c| c.id == holder).unwrap();
        assert_eq!(card.status, CardStatus::Exiting);

        // Completion signal: size conserved, retired id gone.
        pool.handle(
            PoolEvent::AnimationCompleted {
                card: holder,
                from: CardStatus::Exiting,
            },
            &catalog,
            &mut rng,
        );
        assert_eq!(pool.cards().len(), 5);
        assert!(pool.cards().iter().all(|c| c.id != holder));
    }
}
