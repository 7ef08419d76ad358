use std::path::Path;

use image::RgbImage;

use crate::catalog::ImageCatalog;
use crate::config::Config;
use crate::coords::{NativePoint, ScalingFactor, ScreenPoint};
use crate::error::{Error, Result};
use crate::extract::SliceExtractor;
use crate::writer::{PersistedSample, SampleSink, SampleWriter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// An image is shown and points may be marked on it.
    AwaitingInput,
    /// Every catalogued image has been committed.
    Terminated,
    /// The next image could not be loaded after a commit; nothing more can be marked.
    Failed,
}

/// Outcome of one commit.
#[derive(Debug, Default)]
pub struct CommitSummary {
    pub written: Vec<PersistedSample>,
    pub rejected: Vec<NativePoint>,
}

/// Walks the catalog one image at a time, collecting points and turning
/// them into samples on commit.
pub struct AnnotationSession<W = SampleWriter> {
    catalog: ImageCatalog,
    index: usize,
    current: Option<RgbImage>,
    native_width: u32,
    scaling: ScalingFactor,
    extractor: SliceExtractor,
    writer: W,
    points: Vec<NativePoint>,
    failed: bool,
}

impl AnnotationSession {
    /// Build the catalog, prepare the output folder and load the first image.
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = &config.settings;
        let catalog = ImageCatalog::build(&config.input_dir, settings.seed)?;
        config.prepare_output_dir()?;
        Self::start(
            catalog,
            settings.display_width,
            SliceExtractor::new(settings.output_height)?,
            SampleWriter::new(&config.output_dir, settings.extension.as_str()),
        )
    }
}

impl<W: SampleSink> AnnotationSession<W> {
    /// Load the first image and derive the scaling factor from its width.
    pub fn start(
        catalog: ImageCatalog,
        display_width: u32,
        extractor: SliceExtractor,
        writer: W,
    ) -> Result<Self> {
        let Some(first_path) = catalog.get(0) else {
            return Err(Error::configuration("image catalog is empty"));
        };
        let first = load_image(first_path, None)?;
        let native_width = first.width();
        let scaling = ScalingFactor::new(display_width, native_width)?;
        log::info!(
            "Images are {} px wide, displayed at {}x",
            native_width,
            scaling.get()
        );

        Ok(Self {
            catalog,
            index: 0,
            current: Some(first),
            native_width,
            scaling,
            extractor,
            writer,
            points: Vec::new(),
            failed: false,
        })
    }

    pub fn state(&self) -> SessionState {
        match (&self.current, self.failed) {
            (Some(_), _) => SessionState::AwaitingInput,
            (None, false) => SessionState::Terminated,
            (None, true) => SessionState::Failed,
        }
    }

    /// Record a pointer press at a screen position over the displayed image.
    ///
    /// Returns the native point that was recorded, or `None` once no image is shown.
    pub fn on_pointer_press(&mut self, x: u32, y: u32) -> Option<NativePoint> {
        if self.current.is_none() {
            return None;
        }
        let point = self.scaling.screen_to_native(ScreenPoint::new(x, y));
        self.points.push(point);
        Some(point)
    }

    /// Extract and save a strip for every marked point, then move to the
    /// next image (or terminate after the last one).
    ///
    /// A failed write stops the commit: samples already written stay on
    /// disk and are dropped from the point list, the failing point and
    /// those after it are kept, and the session stays on this image.
    ///
    /// If the next image cannot be loaded, the samples of this commit stay
    /// written, the session moves to [`SessionState::Failed`] and the load
    /// error is returned.
    pub fn on_commit_key(&mut self) -> Result<CommitSummary> {
        let mut summary = CommitSummary::default();
        let Some(image) = self.current.as_ref() else {
            return Ok(summary);
        };

        for i in 0..self.points.len() {
            let point = self.points[i];
            let Some(strip) = self.extractor.extract(image, point) else {
                log::debug!("Rejected ({}, {}): strip crosses the image edge", point.x, point.y);
                summary.rejected.push(point);
                continue;
            };
            match self.writer.persist(&strip) {
                Ok(sample) => summary.written.push(sample),
                Err(e) => {
                    self.points.drain(..i);
                    return Err(e);
                }
            }
        }
        self.points.clear();

        log::info!(
            "Committed image {}/{}: {} written, {} rejected",
            self.index + 1,
            self.catalog.len(),
            summary.written.len(),
            summary.rejected.len()
        );
        self.advance()?;
        Ok(summary)
    }

    fn advance(&mut self) -> Result<()> {
        let next = self.index + 1;
        match self.catalog.get(next) {
            Some(path) => match load_image(path, Some(self.native_width)) {
                Ok(image) => {
                    self.current = Some(image);
                    self.index = next;
                }
                Err(e) => {
                    self.current = None;
                    self.failed = true;
                    self.index = next;
                    return Err(e);
                }
            },
            None => {
                log::info!("All {} images committed", self.catalog.len());
                self.current = None;
                self.index = self.catalog.len();
            }
        }
        Ok(())
    }

    /// The image to render, at native resolution. `None` once terminated.
    pub fn current_display_bitmap(&self) -> Option<&RgbImage> {
        self.current.as_ref()
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_ref().and_then(|_| self.catalog.get(self.index))
    }

    /// On-screen size of the current image.
    pub fn display_size(&self) -> Option<(u32, u32)> {
        self.current
            .as_ref()
            .map(|img| self.scaling.display_size(img.width(), img.height()))
    }

    pub fn points(&self) -> &[NativePoint] {
        &self.points
    }

    /// Zero-based index of the current image and the catalog length.
    pub fn position(&self) -> (usize, usize) {
        (self.index, self.catalog.len())
    }

    pub fn scaling(&self) -> ScalingFactor {
        self.scaling
    }

    pub fn extractor(&self) -> &SliceExtractor {
        &self.extractor
    }

    pub fn sink(&self) -> &W {
        &self.writer
    }
}

fn load_image(path: &Path, expected_width: Option<u32>) -> Result<RgbImage> {
    let image = image::open(path)
        .map_err(|source| Error::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();

    if let Some(expected) = expected_width {
        if image.width() != expected {
            return Err(Error::WidthMismatch {
                path: path.to_path_buf(),
                expected,
                found: image.width(),
            });
        }
    }
    log::info!(
        "Loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}
