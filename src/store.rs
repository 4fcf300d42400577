//! Named-artwork persistence.
//!
//! The whole collection lives in one JSON file in the OS data directory
//! (`<data_dir>/PixelFE/artworks.json`): an object mapping artwork name to
//! record. Records are only ever created or overwritten on save and removed
//! by key — nothing mutates a stored record in place.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::canvas::{CodecError, GridSize, PixelCanvas};
use crate::io;

/// Collection filename under the app data folder.
const STORE_FILE: &str = "artworks.json";

// ============================================================================
// RECORDS
// ============================================================================

/// One persisted artwork snapshot. Field names match the on-disk JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArtworkRecord {
    /// `data:image/png;base64,` payload of the full 512×512 raster.
    #[serde(rename = "imageData")]
    pub image_data: String,
    /// Cell count along one grid edge (8/16/32/64).
    #[serde(rename = "gridSize")]
    pub grid_size: u32,
    /// Human-readable UTC save time.
    #[serde(rename = "savedAt")]
    pub saved_at: String,
}

// ============================================================================
// ERRORS
// ============================================================================

/// Error type for store operations. Everything here is recoverable: the UI
/// surfaces the message as a notice and carries on.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    /// The collection file held malformed JSON.
    Parse(serde_json::Error),
    /// A record payload could not be decoded back into a canvas.
    Codec(String),
    NotFound(String),
    /// A record referenced a grid size this build does not support.
    UnsupportedGrid(u32),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "store I/O error: {}", e),
            StoreError::Parse(e) => write!(f, "store file is not valid JSON: {}", e),
            StoreError::Codec(e) => write!(f, "artwork data is corrupt: {}", e),
            StoreError::NotFound(name) => write!(f, "no saved artwork named \"{}\"", name),
            StoreError::UnsupportedGrid(g) => write!(f, "unsupported grid size {}×{}", g, g),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Parse(e)
    }
}

impl From<CodecError> for StoreError {
    fn from(e: CodecError) -> Self {
        StoreError::Codec(e.to_string())
    }
}

// ============================================================================
// ARTWORK STORE
// ============================================================================

/// In-memory view of the artwork collection, backed by one JSON file.
///
/// `BTreeMap` keeps listing order stable (name order) across sessions. Every
/// mutating call persists the whole collection immediately — the file is
/// small and this keeps the on-disk state a pure function of the map.
pub struct ArtworkStore {
    path: PathBuf,
    artworks: BTreeMap<String, ArtworkRecord>,
}

impl ArtworkStore {
    /// Store file location for normal application use.
    pub fn default_path() -> PathBuf {
        io::data_dir().join("PixelFE").join(STORE_FILE)
    }

    /// Open the collection at `path`, creating an empty one when the file
    /// does not exist yet. A present-but-corrupt file is an error: silently
    /// starting empty would overwrite the user's artworks on next save.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let artworks = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::Io(e)),
        };
        Ok(Self { path, artworks })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.artworks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.artworks.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.artworks.contains_key(name)
    }

    /// Records in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ArtworkRecord)> {
        self.artworks.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ArtworkRecord> {
        self.artworks.get(name)
    }

    // ---- lifecycle ---------------------------------------------------------

    /// Snapshot `canvas` under `name`, overwriting any existing record, and
    /// persist the collection. The overwrite confirmation gate lives in the
    /// UI; by the time this runs the decision is made.
    pub fn save(&mut self, name: &str, canvas: &PixelCanvas) -> Result<(), StoreError> {
        let png = canvas.encode_png()?;
        let record = ArtworkRecord {
            image_data: io::encode_data_url(&png),
            grid_size: canvas.grid().cells(),
            saved_at: io::saved_at_now(),
        };
        self.artworks.insert(name.to_string(), record);
        self.persist()
    }

    /// Decode the named record back into a canvas. Restores the stored grid
    /// size; the caller replaces its canvas wholesale.
    pub fn load(&self, name: &str) -> Result<PixelCanvas, StoreError> {
        let record = self
            .artworks
            .get(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        Self::decode_record(record)
    }

    /// Decode any record (used by the gallery for thumbnails and by the CLI
    /// without going through a name lookup twice).
    pub fn decode_record(record: &ArtworkRecord) -> Result<PixelCanvas, StoreError> {
        let grid = GridSize::from_cells(record.grid_size)
            .ok_or(StoreError::UnsupportedGrid(record.grid_size))?;
        let png = io::decode_data_url(&record.image_data).map_err(StoreError::Codec)?;
        Ok(PixelCanvas::decode_png(&png, grid)?)
    }

    /// Delete by key and persist. Unknown names are an error so the UI can
    /// tell the user instead of pretending success.
    pub fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        if self.artworks.remove(name).is_none() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.artworks)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    fn scratch_store() -> (TempDir, ArtworkStore) {
        let dir = TempDir::new().unwrap();
        let store = ArtworkStore::open(dir.path().join(STORE_FILE)).unwrap();
        (dir, store)
    }

    fn painted_canvas(grid: GridSize) -> PixelCanvas {
        let mut canvas = PixelCanvas::new(grid);
        canvas.set_cell(0, 0, Rgba([10, 20, 30, 255]));
        canvas.set_cell(grid.cells() - 1, grid.cells() - 1, Rgba([200, 100, 50, 255]));
        canvas
    }

    #[test]
    fn save_then_load_round_trips_pixels_and_grid() {
        let (_dir, mut store) = scratch_store();
        for g in GridSize::all() {
            let canvas = painted_canvas(*g);
            store.save("roundtrip", &canvas).unwrap();
            let restored = store.load("roundtrip").unwrap();
            assert_eq!(restored.grid(), *g);
            assert_eq!(restored.pixels().as_raw(), canvas.pixels().as_raw());
        }
    }

    #[test]
    fn collection_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STORE_FILE);
        {
            let mut store = ArtworkStore::open(path.clone()).unwrap();
            store.save("first", &painted_canvas(GridSize::G8)).unwrap();
            store.save("second", &painted_canvas(GridSize::G32)).unwrap();
        }
        let store = ArtworkStore::open(path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("first").unwrap().grid_size, 8);
        assert_eq!(store.get("second").unwrap().grid_size, 32);
        assert!(store.load("second").is_ok());
    }

    #[test]
    fn save_overwrites_existing_record() {
        let (_dir, mut store) = scratch_store();
        store.save("art", &painted_canvas(GridSize::G8)).unwrap();
        let mut second = PixelCanvas::new(GridSize::G64);
        second.set_cell(5, 5, Rgba([1, 2, 3, 255]));
        store.save("art", &second).unwrap();

        assert_eq!(store.len(), 1);
        let restored = store.load("art").unwrap();
        assert_eq!(restored.grid(), GridSize::G64);
        assert_eq!(restored.cell_color(5, 5), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn remove_deletes_by_key() {
        let (_dir, mut store) = scratch_store();
        store.save("keep", &painted_canvas(GridSize::G16)).unwrap();
        store.save("drop", &painted_canvas(GridSize::G16)).unwrap();
        store.remove("drop").unwrap();
        assert!(store.get("drop").is_none());
        assert!(store.get("keep").is_some());
        assert!(matches!(store.remove("drop"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn missing_name_is_not_found() {
        let (_dir, store) = scratch_store();
        assert!(matches!(store.load("ghost"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn corrupt_collection_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STORE_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            ArtworkStore::open(path),
            Err(StoreError::Parse(_))
        ));
    }

    #[test]
    fn unsupported_grid_size_is_rejected_on_load() {
        let (_dir, mut store) = scratch_store();
        store.save("art", &painted_canvas(GridSize::G16)).unwrap();
        // Corrupt the record's grid size in place.
        let record = store.artworks.get_mut("art").unwrap();
        record.grid_size = 24;
        let record = store.get("art").unwrap().clone();
        assert!(matches!(
            ArtworkStore::decode_record(&record),
            Err(StoreError::UnsupportedGrid(24))
        ));
    }

    #[test]
    fn on_disk_format_uses_camel_case_field_names() {
        let (_dir, mut store) = scratch_store();
        store.save("art", &painted_canvas(GridSize::G16)).unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        let record = &json["art"];
        assert!(record["imageData"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,"));
        assert_eq!(record["gridSize"], 16);
        assert!(record["savedAt"].is_string());
    }
}
