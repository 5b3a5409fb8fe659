use raylib::prelude::*;

use crate::catalog::Catalog;

/// A wall variant: takes ownership of the catalog, owns its state machine,
/// and renders each frame into the framebuffer.
pub trait Engine {
    fn initialize(
        &mut self,
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        catalog: Catalog,
    ) -> anyhow::Result<()>;

    fn render_frame(
        &mut self,
        dt: f32,
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        framebuffer: &mut RenderTexture2D,
    );

    /// Stops the engine's timers so nothing fires after teardown.
    fn shutdown(&mut self);
}
