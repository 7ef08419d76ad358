use std::path::PathBuf;

use crate::coords::NativePoint;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad arguments, bad config file, or a display too narrow for the images.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("no images found in {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{} is {found} px wide, expected {expected} px", path.display())]
    WidthMismatch {
        path: PathBuf,
        expected: u32,
        found: u32,
    },

    /// Writing the sample for `point` failed; the rest of the commit was abandoned.
    #[error("failed to write sample for point ({}, {}) to {}: {source}", point.x, point.y, path.display())]
    Write {
        point: NativePoint,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }
}
