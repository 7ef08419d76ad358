use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};

/// Shuffled, fixed list of the images to annotate.
#[derive(Clone, Debug)]
pub struct ImageCatalog {
    paths: Vec<PathBuf>,
}

impl ImageCatalog {
    /// List `folder` and shuffle it with the thread RNG, or with a seeded
    /// RNG when `seed` is given.
    pub fn build(folder: &Path, seed: Option<u64>) -> Result<Self> {
        match seed {
            Some(seed) => Self::build_with_rng(folder, &mut StdRng::seed_from_u64(seed)),
            None => Self::build_with_rng(folder, &mut rand::rng()),
        }
    }

    pub fn build_with_rng<R: Rng + ?Sized>(folder: &Path, rng: &mut R) -> Result<Self> {
        let mut paths = list_files(folder)?;
        if paths.is_empty() {
            return Err(Error::NotFound {
                path: folder.to_path_buf(),
                source: None,
            });
        }
        // read_dir order is platform dependent; sort so a seed reproduces the order
        paths.sort();
        paths.shuffle(rng);

        log::info!("Catalogued {} images in {}", paths.len(), folder.display());
        Ok(Self { paths })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

fn list_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let not_found = |e: std::io::Error| Error::NotFound {
        path: folder.to_path_buf(),
        source: Some(e),
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(folder).map_err(not_found)? {
        let entry = entry.map_err(not_found)?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        // follows symlinks, unlike DirEntry::file_type
        if hidden || !entry.path().is_file() {
            continue;
        }
        paths.push(entry.path());
    }
    Ok(paths)
}
