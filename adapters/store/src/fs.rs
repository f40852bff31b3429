use std::{
    fs, io,
    path::{Path, PathBuf},
};

use raster_life_core::{RasterBand, RasterPayload, RasterStore, StoreError};

use crate::encoding;

const RASTER_EXTENSION: &str = "raster";

/// File-backed raster store keeping one encoded file per identifier.
///
/// Identifiers map to `<root>/<identifier>.raster`; saving overwrites any
/// existing slot, which is what the overwrite snapshot policy relies on.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at the provided directory, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|error| StoreError::RasterWrite {
            destination: root.display().to_string(),
            reason: error.to_string(),
        })?;
        Ok(Self { root })
    }

    /// Directory holding the store's raster files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path backing the provided identifier.
    #[must_use]
    pub fn path_for(&self, identifier: &str) -> PathBuf {
        self.root
            .join(format!("{identifier}.{RASTER_EXTENSION}"))
    }
}

impl RasterStore for FileStore {
    fn load(&self, identifier: &str, band: RasterBand) -> Result<RasterPayload, StoreError> {
        if band != RasterBand::FIRST {
            return Err(StoreError::RasterRead {
                identifier: identifier.to_owned(),
                reason: format!("band {} is not present in a single-band raster", band.get()),
            });
        }

        let path = self.path_for(identifier);
        let contents = fs::read_to_string(&path).map_err(|error| {
            if error.kind() == io::ErrorKind::NotFound {
                StoreError::RasterNotFound {
                    identifier: identifier.to_owned(),
                }
            } else {
                StoreError::RasterRead {
                    identifier: identifier.to_owned(),
                    reason: error.to_string(),
                }
            }
        })?;

        encoding::decode(&contents).map_err(|error| StoreError::RasterRead {
            identifier: identifier.to_owned(),
            reason: error.to_string(),
        })
    }

    fn save(&mut self, payload: &RasterPayload, destination: &str) -> Result<(), StoreError> {
        let path = self.path_for(destination);
        fs::write(&path, encoding::encode(payload)).map_err(|error| StoreError::RasterWrite {
            destination: destination.to_owned(),
            reason: error.to_string(),
        })
    }

    fn delete(&mut self, identifier: &str) -> Result<(), StoreError> {
        let path = self.path_for(identifier);
        fs::remove_file(&path).map_err(|error| {
            if error.kind() == io::ErrorKind::NotFound {
                StoreError::RasterNotFound {
                    identifier: identifier.to_owned(),
                }
            } else {
                StoreError::RasterWrite {
                    destination: identifier.to_owned(),
                    reason: error.to_string(),
                }
            }
        })
    }
}
