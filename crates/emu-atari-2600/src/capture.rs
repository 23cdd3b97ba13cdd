//! Headless capture: PNG screenshots.

use std::error::Error;
use std::fs;
use std::io::BufWriter;
use std::path::Path;

use crate::Atari2600;

/// Save the current framebuffer as a PNG file.
///
/// The framebuffer is already RGB24, so it goes to the encoder as is.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_screenshot(atari: &Atari2600, path: &Path) -> Result<(), Box<dyn Error>> {
    let file = fs::File::create(path)?;
    let mut encoder = png::Encoder::new(
        BufWriter::new(file),
        atari.framebuffer_width(),
        atari.framebuffer_height(),
    );
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(atari.framebuffer())?;
    Ok(())
}

/// Record video: dump frames as PNGs.
///
/// # Errors
///
/// Returns an error if the emulator faults or a frame cannot be saved.
pub fn record(atari: &mut Atari2600, dir: &Path, num_frames: u32) -> Result<(), Box<dyn Error>> {
    let frames_dir = dir.join("frames");
    fs::create_dir_all(&frames_dir)?;

    for i in 1..=num_frames {
        atari.run_frame()?;
        save_screenshot(atari, &frames_dir.join(format!("{i:06}.png")))?;
    }

    eprintln!("Captured {num_frames} frames to {}", frames_dir.display());
    Ok(())
}
