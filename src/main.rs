use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Parser, ValueEnum};
use raylib::prelude::*;

mod catalog;
mod carousel;
mod constants;
mod engine;
mod ffmpeg;
mod floating;
mod texture_loader;
mod timer;

use crate::carousel::engine::CarouselEngine;
use crate::catalog::Catalog;
use crate::constants::*;
use crate::engine::Engine;
use crate::ffmpeg::Ffmpeg;
use crate::floating::engine::FloatingEngine;

/// Ambient "living wall": cycles a directory of images through an animated
/// card arrangement until the window is closed.
#[derive(Parser)]
#[command(name = "living-wall")]
struct Args {
    /// Directory containing the card images
    images: PathBuf,

    /// Which wall variant to run
    #[arg(long, value_enum, default_value_t = Mode::Floating)]
    mode: Mode,

    /// Also encode the wall into this H.264 file (runs at a fixed frame step)
    #[arg(long, value_name = "FILE")]
    record: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Five drifting cards with a periodic spotlight
    Floating,
    /// Depth carousel cycling through five slots
    Carousel,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let catalog = Catalog::scan(&args.images)?;
    println!(
        "Loaded {} images from {}",
        catalog.len(),
        args.images.display()
    );

    let (mut rl, thread) = raylib::init()
        .size(RENDER_WIDTH / 2, RENDER_HEIGHT / 2)
        .title("Living Wall")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    let mut engine: Box<dyn Engine> = match args.mode {
        Mode::Floating => Box::new(FloatingEngine::new()),
        Mode::Carousel => Box::new(CarouselEngine::new()),
    };
    engine.initialize(&mut rl, &thread, catalog)?;

    let mut recorder = match &args.record {
        Some(file) => Some(Ffmpeg::new(RENDER_WIDTH, RENDER_HEIGHT, FPS, file)?),
        None => None,
    };

    let mut framebuffer = rl
        .load_render_texture(&thread, RENDER_WIDTH as u32, RENDER_HEIGHT as u32)
        .map_err(|e| anyhow!("failed to create render texture: {e}"))?;

    while !rl.window_should_close() {
        // A fixed step keeps the encoded video timing exact; live viewing
        // follows the wall clock.
        let dt = if recorder.is_some() {
            FRAME_TIME
        } else {
            rl.get_frame_time()
        };

        engine.render_frame(dt, &mut rl, &thread, &mut framebuffer);

        // Blit the fixed-size framebuffer to the (resizable) window. Render
        // textures are stored bottom-up, hence the negative source height.
        let mut d = rl.begin_drawing(&thread);
        let sw = d.get_screen_width() as f32;
        let sh = d.get_screen_height() as f32;
        d.draw_texture_pro(
            &framebuffer,
            Rectangle::new(
                0.0,
                0.0,
                framebuffer.width() as f32,
                -(framebuffer.height() as f32),
            ),
            Rectangle::new(0.0, 0.0, sw, sh),
            Vector2::new(0.0, 0.0),
            0.0,
            Color::WHITE,
        );
        drop(d);

        if let Some(recorder) = recorder.as_mut() {
            let image = framebuffer
                .load_image()
                .map_err(|e| anyhow!("failed to read framebuffer: {e}"))?;
            recorder.write(&image)?;
        }
    }

    engine.shutdown();
    Ok(())
}
