//! Build a strip dataset from wide images: mark points on each image, and a
//! fixed-height, full-width strip around every point is saved as a sample.

pub mod catalog;
pub mod config;
pub mod coords;
pub mod error;
pub mod extract;
pub mod session;
pub mod writer;

pub use catalog::ImageCatalog;
pub use config::{Cli, Config, Settings};
pub use coords::{screen_to_native, NativePoint, ScalingFactor, ScreenPoint};
pub use error::{Error, Result};
pub use extract::{SliceExtractor, Strip};
pub use session::{AnnotationSession, CommitSummary, SessionState};
pub use writer::{parse_sample_name, sample_file_name, PersistedSample, SampleSink, SampleWriter};
