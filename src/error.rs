use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhixelError {
    #[error("image dimensions cannot be zero")]
    ZeroDimension,

    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch {
        len: usize,
        width: u32,
        height: u32,
    },

    #[error("block size must be at least 1")]
    InvalidBlockSize,

    #[error("image is smaller than one {block_size}x{block_size} block, nothing left after cropping")]
    CropTooSmall { block_size: u32 },

    #[error("invalid resize target {0:?}, expected WIDTHxHEIGHT with nonzero dimensions")]
    InvalidResizeTarget(String),

    #[error("no built-in palette named {0:?}")]
    UnknownPalette(String),

    #[error("failed to read palette file {path}")]
    PaletteRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed palette document: expected a JSON array of 3-element color triplets")]
    PaletteParse(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
