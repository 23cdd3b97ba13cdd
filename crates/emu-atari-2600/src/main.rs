//! Atari 2600 emulator binary.
//!
//! Runs with a winit window and pixels framebuffer, or headless for
//! screenshots and frame dumps.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use emu_atari_2600::{Atari2600, Atari2600Config, VideoConfig, capture, controller_map};
use emu_core::MasterClock;
use pixels::{Pixels, SurfaceTexture};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

/// NTSC field rate.
const FRAMES_PER_SECOND: u64 = 60;

#[derive(Parser, Debug)]
#[command(version, about = "Atari 2600 emulator", long_about = None)]
struct Args {
    /// Raw 2K or 4K cartridge image
    #[arg(long)]
    rom: PathBuf,

    /// Run without a window
    #[arg(long)]
    headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 200)]
    frames: u32,

    /// Save a PNG screenshot after the last frame (headless)
    #[arg(long)]
    screenshot: Option<PathBuf>,

    /// Dump every frame as PNG into this directory (headless)
    #[arg(long)]
    record: Option<PathBuf>,

    /// First scanline shown
    #[arg(long, default_value_t = 40)]
    first_line: u16,

    /// Number of scanlines shown
    #[arg(long, default_value_t = 192)]
    lines: u16,

    /// Window scale factor
    #[arg(long, default_value_t = 4)]
    scale: u32,
}

// ---------------------------------------------------------------------------
// Headless mode
// ---------------------------------------------------------------------------

fn run_headless(args: &Args, mut atari: Atari2600) -> anyhow::Result<()> {
    if let Some(dir) = &args.record {
        capture::record(&mut atari, dir, args.frames)
            .map_err(|e| anyhow::anyhow!("record failed: {e}"))?;
        return Ok(());
    }

    for _ in 0..args.frames {
        atari.run_frame()?;
    }

    if let Some(path) = &args.screenshot {
        capture::save_screenshot(&atari, path)
            .map_err(|e| anyhow::anyhow!("screenshot failed: {e}"))?;
        eprintln!("Screenshot saved to {}", path.display());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Windowed mode (winit + pixels)
// ---------------------------------------------------------------------------

struct App {
    atari: Atari2600,
    scale: u32,
    frame_duration: Duration,
    window: Option<&'static Window>,
    pixels: Option<Pixels<'static>>,
    last_frame_time: Instant,
    /// Set when emulation stops on an error.
    fault: Option<anyhow::Error>,
}

impl App {
    fn new(atari: Atari2600, scale: u32) -> Self {
        let clock = MasterClock::NTSC;
        Self {
            atari,
            scale,
            frame_duration: clock.duration_of(clock.ticks_per_frame(FRAMES_PER_SECOND)),
            window: None,
            pixels: None,
            last_frame_time: Instant::now(),
            fault: None,
        }
    }

    fn handle_key(&mut self, keycode: KeyCode, pressed: bool) {
        if let Some(control) = controller_map::map_keycode(keycode) {
            if pressed {
                self.atari.press(control);
            } else {
                self.atari.release(control);
            }
        }
    }

    fn update_pixels(&mut self) {
        let Some(pixels) = self.pixels.as_mut() else {
            return;
        };

        // RGB24 → RGBA
        let frame = pixels.frame_mut();
        for (dst, src) in frame
            .chunks_exact_mut(4)
            .zip(self.atari.framebuffer().chunks_exact(3))
        {
            dst[..3].copy_from_slice(src);
            dst[3] = 0xFF;
        }
    }

    fn stop(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        self.fault = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let width = self.atari.framebuffer_width();
        let height = self.atari.framebuffer_height();
        // Pixels are roughly twice as wide as they are tall.
        let window_size = winit::dpi::LogicalSize::new(width * self.scale * 2, height * self.scale);
        let attrs = WindowAttributes::default()
            .with_title("Atari 2600")
            .with_inner_size(window_size)
            .with_resizable(false);

        let window = match event_loop.create_window(attrs) {
            Ok(window) => window,
            Err(e) => {
                self.stop(event_loop, anyhow::anyhow!("failed to create window: {e}"));
                return;
            }
        };
        let window: &'static Window = Box::leak(Box::new(window));
        let inner = window.inner_size();
        let surface = SurfaceTexture::new(inner.width, inner.height, window);
        match Pixels::new(width, height, surface) {
            Ok(pixels) => self.pixels = Some(pixels),
            Err(e) => {
                self.stop(event_loop, anyhow::anyhow!("failed to create pixels: {e}"));
                return;
            }
        }
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    if keycode == KeyCode::Escape && event.state == ElementState::Pressed {
                        event_loop.exit();
                        return;
                    }
                    self.handle_key(keycode, event.state == ElementState::Pressed);
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                if now.duration_since(self.last_frame_time) >= self.frame_duration {
                    if let Err(e) = self.atari.run_frame() {
                        self.stop(event_loop, e.into());
                        return;
                    }
                    self.update_pixels();
                    self.last_frame_time = now;
                }

                if let Some(pixels) = self.pixels.as_ref() {
                    if let Err(e) = pixels.render() {
                        self.stop(event_loop, anyhow::anyhow!("render error: {e}"));
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window {
            window.request_redraw();
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn make_atari(args: &Args) -> anyhow::Result<Atari2600> {
    let rom_data = std::fs::read(&args.rom)
        .with_context(|| format!("failed to read ROM file {}", args.rom.display()))?;
    let config = Atari2600Config {
        rom_data,
        video: VideoConfig {
            first_visible_line: args.first_line,
            visible_lines: args.lines,
        },
    };
    let atari = Atari2600::new(&config).context("failed to load ROM")?;
    eprintln!("Loaded ROM: {}", args.rom.display());
    Ok(atari)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let atari = make_atari(&args)?;

    if args.headless {
        return run_headless(&args, atari);
    }

    let mut app = App::new(atari, args.scale);
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.run_app(&mut app).context("event loop error")?;

    match app.fault.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
