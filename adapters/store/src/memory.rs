use std::collections::HashMap;

use raster_life_core::{RasterBand, RasterPayload, RasterStore, StoreError};

/// In-memory raster store used by tests and embedded callers.
///
/// Behaves like [`crate::FileStore`] without touching the filesystem: save
/// overwrites, load clones, delete fails with `RasterNotFound` when the slot
/// never existed.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    rasters: HashMap<String, RasterPayload>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether a raster exists under the identifier.
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.rasters.contains_key(identifier)
    }

    /// Number of rasters currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rasters.len()
    }

    /// Reports whether the store holds no rasters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rasters.is_empty()
    }

    /// Identifiers currently held, in unspecified order.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&str> {
        self.rasters.keys().map(String::as_str).collect()
    }
}

impl RasterStore for MemoryStore {
    fn load(&self, identifier: &str, band: RasterBand) -> Result<RasterPayload, StoreError> {
        if band != RasterBand::FIRST {
            return Err(StoreError::RasterRead {
                identifier: identifier.to_owned(),
                reason: format!("band {} is not present in a single-band raster", band.get()),
            });
        }

        self.rasters
            .get(identifier)
            .cloned()
            .ok_or_else(|| StoreError::RasterNotFound {
                identifier: identifier.to_owned(),
            })
    }

    fn save(&mut self, payload: &RasterPayload, destination: &str) -> Result<(), StoreError> {
        let _ = self
            .rasters
            .insert(destination.to_owned(), payload.clone());
        Ok(())
    }

    fn delete(&mut self, identifier: &str) -> Result<(), StoreError> {
        match self.rasters.remove(identifier) {
            Some(_) => Ok(()),
            None => Err(StoreError::RasterNotFound {
                identifier: identifier.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use raster_life_core::{
        GeoPoint, GeoReference, GridSize, RasterBand, RasterPayload, RasterStore, Srid, StoreError,
    };

    fn sample_payload() -> RasterPayload {
        RasterPayload {
            values: vec![0.0, 1.0],
            size: GridSize::new(2, 1),
            geo: GeoReference::new(GeoPoint::new(0.0, 1.0), 1.0, -1.0, Srid::WGS84),
        }
    }

    #[test]
    fn save_then_load_returns_equal_payload() {
        let mut store = MemoryStore::new();
        let payload = sample_payload();
        store.save(&payload, "start").expect("save");
        assert_eq!(store.load("start", RasterBand::FIRST).expect("load"), payload);
    }

    #[test]
    fn load_of_missing_identifier_fails() {
        let store = MemoryStore::new();
        assert_eq!(
            store.load("absent", RasterBand::FIRST),
            Err(StoreError::RasterNotFound {
                identifier: "absent".to_owned(),
            })
        );
    }

    #[test]
    fn delete_is_fallible_for_missing_slots() {
        let mut store = MemoryStore::new();
        store.save(&sample_payload(), "cycle").expect("save");
        store.delete("cycle").expect("delete");
        assert!(store.is_empty());
        assert!(matches!(
            store.delete("cycle"),
            Err(StoreError::RasterNotFound { .. })
        ));
    }
}
