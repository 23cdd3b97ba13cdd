//! Machine configuration.

pub use atari_tia::VideoConfig;

/// Atari 2600 configuration.
pub struct Atari2600Config {
    /// Raw cartridge image, 2K or 4K.
    pub rom_data: Vec<u8>,
    pub video: VideoConfig,
}
