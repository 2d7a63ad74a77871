use crate::framebuffer::{Framebuffer, HEIGHT, WIDTH};
use log::info;
use pixels::{Pixels, SurfaceTexture};
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

const LIT: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];
const UNLIT: [u8; 4] = [0x0, 0x0, 0x0, 0xFF];

#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Failed to create pixel surface: {0}")]
    Pixels(#[from] pixels::Error),

    #[error("Failed to resize pixel surface: {0}")]
    Texture(#[from] pixels::TextureError),
}

/// A window that paints the interpreter's framebuffer.
#[derive(Debug)]
pub struct Display {
    window: Window,
    pixels: Pixels,
}

impl Display {
    pub fn new(event_loop: &EventLoop<()>, scale: f64) -> Result<Self, DisplayError> {
        let window = {
            let size = LogicalSize::new(WIDTH as u32, HEIGHT as u32);
            let scaled_size = LogicalSize::new(WIDTH as f64 * scale, HEIGHT as f64 * scale);
            WindowBuilder::new()
                .with_title("CHIP-8")
                .with_inner_size(scaled_size)
                .with_min_inner_size(size)
                .build(event_loop)?
        };

        let pixels = {
            let size = window.inner_size();
            let texture = SurfaceTexture::new(size.width, size.height, &window);
            Pixels::new(WIDTH as u32, HEIGHT as u32, texture)?
        };

        info!("Attached display [scale: {scale}]");
        Ok(Self { window, pixels })
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) -> Result<(), DisplayError> {
        self.pixels.resize_surface(size.width, size.height)?;
        Ok(())
    }

    pub fn render(&mut self, framebuffer: &Framebuffer) -> Result<(), DisplayError> {
        paint(self.pixels.get_frame_mut(), framebuffer);
        self.pixels.render()?;
        Ok(())
    }
}

/// Expands one cell per pixel into RGBA.
fn paint(frame: &mut [u8], framebuffer: &Framebuffer) {
    let cells = framebuffer.rows().iter().flat_map(|row| row.iter());
    for (pixel, cell) in frame.chunks_exact_mut(4).zip(cells) {
        pixel.copy_from_slice(if *cell == 1 { &LIT } else { &UNLIT });
    }
}
