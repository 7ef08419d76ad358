use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::coords::NativePoint;
use crate::error::{Error, Result};
use crate::extract::Strip;

/// A strip that has been written to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistedSample {
    pub path: PathBuf,
    pub point: NativePoint,
    pub id: Uuid,
}

/// Names and saves strips into the output folder.
#[derive(Clone, Debug)]
pub struct SampleWriter {
    output_dir: PathBuf,
    extension: String,
}

impl SampleWriter {
    /// `extension` selects the encoder, e.g. `png`.
    pub fn new(output_dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            extension: extension.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn write(&self, strip: &Strip) -> Result<PersistedSample> {
        let id = Uuid::new_v4();
        let path = self
            .output_dir
            .join(sample_file_name(strip.origin, id, &self.extension));

        strip.image.save(&path).map_err(|source| Error::Write {
            point: strip.origin,
            path: path.clone(),
            source,
        })?;
        log::debug!("Wrote {}", path.display());

        Ok(PersistedSample {
            path,
            point: strip.origin,
            id,
        })
    }
}

/// Where a session sends accepted strips.
pub trait SampleSink {
    fn persist(&mut self, strip: &Strip) -> Result<PersistedSample>;
}

impl SampleSink for SampleWriter {
    fn persist(&mut self, strip: &Strip) -> Result<PersistedSample> {
        self.write(strip)
    }
}

/// `x{x}_y{y}_{uuid}.{ext}`
pub fn sample_file_name(point: NativePoint, id: Uuid, extension: &str) -> String {
    format!("x{}_y{}_{}.{}", point.x, point.y, id, extension)
}

/// Recover the click position and identifier from a sample file name.
pub fn parse_sample_name(file_name: &str) -> Option<(NativePoint, Uuid)> {
    let (stem, _ext) = file_name.rsplit_once('.')?;
    let rest = stem.strip_prefix('x')?;
    let (x, rest) = rest.split_once("_y")?;
    let (y, id) = rest.split_once('_')?;
    Some((
        NativePoint::new(x.parse().ok()?, y.parse().ok()?),
        Uuid::parse_str(id).ok()?,
    ))
}
