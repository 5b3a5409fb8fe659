use raylib::prelude::*;

use crate::carousel::deck::{Deck, Slot, SlotStyle};
use crate::catalog::Catalog;
use crate::constants::*;
use crate::engine::Engine;
use crate::texture_loader::load_catalog_textures;

// Drawn width of the center card as a fraction of the render width.
const CENTER_CARD_FRACTION: f32 = 0.42;

/// Animation executor for the depth carousel.
///
/// The deck is a pure function of its counter; this engine only remembers
/// how long ago the last advance fired and eases every visible card from the
/// style of the slot it came from toward the style of the slot it is in.
pub struct CarouselEngine {
    catalog: Option<Catalog>,
    textures: Vec<Option<Texture2D>>,
    deck: Option<Deck>,
    since_advance: f32,
}

impl CarouselEngine {
    pub fn new() -> Self {
        Self {
            catalog: None,
            textures: Vec::new(),
            deck: None,
            since_advance: SLOT_TRANSITION_DURATION,
        }
    }
}

fn ease_out(u: f32) -> f32 {
    let u = u.clamp(0.0, 1.0);
    1.0 - (1.0 - u).powi(3)
}

impl Engine for CarouselEngine {
    fn initialize(
        &mut self,
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        catalog: Catalog,
    ) -> anyhow::Result<()> {
        self.textures = load_catalog_textures(rl, thread, &catalog);
        self.deck = Some(Deck::new(catalog.len())?);
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
        let Some(deck) = self.deck.as_mut() else {
            return;
        };

        if deck.tick(dt) > 0 {
            self.since_advance = 0.0;
            if let Some(catalog) = self.catalog.as_ref() {
                println!("Center: {}", catalog.get(deck.active_index()).display());
            }
        } else {
            self.since_advance += dt;
        }
        let t = ease_out(self.since_advance / SLOT_TRANSITION_DURATION);

        // Every card eases from the slot it occupied before the last advance
        // (one offset further along) into its current slot.
        let mut cards: Vec<(SlotStyle, usize)> = deck
            .visible()
            .iter()
            .map(|card| {
                let from = Slot::from_offset(card.offset + 1).style();
                let to = card.slot.style();
                (SlotStyle::lerp(from, to, t), card.image_index)
            })
            .collect();
        cards.sort_by_key(|(style, _)| style.layer);

        rl.draw_texture_mode(thread, framebuffer, |mut tmd| {
            let mut d = tmd.begin_drawing(thread);
            d.clear_background(Color::BLACK);

            for (style, image_index) in &cards {
                let Some(texture) = self.textures[*image_index].as_ref() else {
                    continue;
                };

                let width = RENDER_WIDTH as f32 * CENTER_CARD_FRACTION * style.scale;
                let height = width * texture.height() as f32 / texture.width() as f32;
                let center_x = RENDER_WIDTH as f32 / 2.0;
                let center_y = RENDER_HEIGHT as f32 / 2.0 + style.shift_y * RENDER_HEIGHT as f32;

                // No cheap gaussian in raylib; depth blur is approximated by
                // fading the card with its blur amount.
                let alpha = style.opacity * (1.0 - 0.3 * style.blur);

                d.draw_texture_pro(
                    texture,
                    Rectangle::new(0.0, 0.0, texture.width() as f32, texture.height() as f32),
                    Rectangle::new(
                        center_x - width / 2.0,
                        center_y - height / 2.0,
                        width,
                        height,
                    ),
                    Vector2::new(0.0, 0.0),
                    0.0,
                    Color::WHITE.fade(alpha),
                );
            }
        });
    }

    fn shutdown(&mut self) {
        if let Some(deck) = self.deck.as_mut() {
            deck.stop();
        }
    }
}
