pub const RENDER_WIDTH: i32 = 1920;           // Width of the render texture
pub const RENDER_HEIGHT: i32 = 1080;          // Height of the render texture
pub const FPS: u32 = 60;                      // Frames per second
pub const FRAME_TIME: f32 = 1.0 / FPS as f32; // Time per frame (seconds)

// --- Floating wall (pool) ---
pub const MAX_CARDS: usize = 5;               // Cards held in the pool at all times
pub const SPOTLIGHT_CHECK_PERIOD: f32 = 18.0; // Seconds between spotlight candidate checks
pub const SPOTLIGHT_HOLD: f32 = 12.0;         // Seconds a spotlighted card stays enlarged

pub const CARD_WIDTH: f32 = 320.0;            // On-screen card width (pixels)
pub const CARD_EST_HEIGHT: f32 = 240.0;       // Estimated card height used for vertical bounds
pub const BUFFER_X: f32 = 40.0;               // Horizontal inset kept clear of the container edges
pub const BUFFER_TOP: f32 = 60.0;             // Top inset
pub const BUFFER_BOTTOM: f32 = 80.0;          // Bottom inset (leaves room for captions/shadows)

pub const DRIFT_DURATION_MIN: f32 = 20.0;     // Oscillation duration lower bound (seconds)
pub const DRIFT_DURATION_MAX: f32 = 40.0;     // Oscillation duration upper bound (seconds)

pub const SPOTLIGHT_SCALE: f32 = 2.4;          // Enlargement factor of the spotlighted card
pub const SPOTLIGHT_ENTER_DURATION: f32 = 1.2; // Seconds to tween into the spotlight
pub const SPOTLIGHT_EXIT_DURATION: f32 = 0.8;  // Seconds for the exit animation

// --- Depth carousel (deck) ---
pub const CYCLE_PERIOD: f32 = 5.0;             // Seconds between carousel advances
pub const SLOT_TRANSITION_DURATION: f32 = 1.0; // Seconds to settle into the new slot
