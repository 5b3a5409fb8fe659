use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::Context;
use raylib::prelude::*;

/// Pipes raw framebuffer frames into an ffmpeg child process encoding H.264.
pub struct Ffmpeg {
    process: std::process::Child,
    stdin: Option<std::process::ChildStdin>,
}

impl Ffmpeg {
    pub fn new(width: i32, height: i32, fps: u32, video_name: &str) -> anyhow::Result<Ffmpeg> {
        let mut process = Command::new("ffmpeg")
            .stdin(Stdio::piped())
            .args(["-loglevel", "error"])
            .arg("-y")
            .args(["-f", "rawvideo"])
            .args(["-pixel_format", "rgba"])
            .args(["-video_size", &format!("{}x{}", width, height)])
            .args(["-framerate", &format!("{}", fps)])
            .args(["-i", "-"])
            .args(["-c:v", "libx264"])
            .args(["-pix_fmt", "yuv420p"])
            .arg(video_name)
            .spawn()
            .context("failed to start ffmpeg process")?;
        let stdin = process
            .stdin
            .take()
            .context("failed to open ffmpeg stdin")?;
        Ok(Ffmpeg {
            process,
            stdin: Some(stdin),
        })
    }

    pub fn write(&mut self, image: &Image) -> anyhow::Result<()> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Ok(());
        };
        unsafe {
            let image_ptr = image.data() as *const u8;
            let image_len = (image.width() * image.height() * 4) as usize; // RGBA
            let image_slice = std::slice::from_raw_parts(image_ptr, image_len);

            // Raylib framebuffers are bottom-to-top; ffmpeg wants rows
            // top-to-bottom, so write them flipped.
            for y in 0..image.height() {
                let row_start = (image.height() - 1 - y) * image.width() * 4;
                let row_end = row_start + image.width() * 4;
                let row_slice = &image_slice[row_start as usize..row_end as usize];
                stdin
                    .write_all(row_slice)
                    .context("failed to write frame to ffmpeg")?;
            }
        }
        Ok(())
    }
}

impl Drop for Ffmpeg {
    fn drop(&mut self) {
        // Close the stdin pipe and let ffmpeg flush its output.
        self.stdin = None;
        let _ = self.process.wait();
    }
}
