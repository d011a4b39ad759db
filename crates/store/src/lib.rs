use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use layers::MapConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedMap {
    pub id: String,
    pub name: String,
    pub config: MapConfig,
    pub created_at_ms: u64,
}

impl SavedMap {
    /// Wraps `config` under its content-addressed id.
    pub fn new(
        name: impl Into<String>,
        config: MapConfig,
        created_at_ms: u64,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            id: id_for_config(&config)?,
            name: name.into(),
            config,
            created_at_ms,
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub maps: BTreeMap<String, SavedMap>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound,
    Corrupt(String),
    Io(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "saved map not found"),
            StoreError::Corrupt(msg) => write!(f, "map storage corrupt: {msg}"),
            StoreError::Io(msg) => write!(f, "map storage error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

pub trait MapStore {
    fn list(&self) -> Result<Vec<SavedMap>, StoreError>;
    fn get(&self, id: &str) -> Result<Option<SavedMap>, StoreError>;
    fn upsert(&mut self, map: SavedMap) -> Result<(), StoreError>;
    fn delete(&mut self, id: &str) -> Result<bool, StoreError>;

    /// Like [`MapStore::get`] but a missing id is an error.
    fn load(&self, id: &str) -> Result<SavedMap, StoreError> {
        self.get(id)?.ok_or(StoreError::NotFound)
    }
}

/// Content id of a map configuration.
///
/// Hashes the JSON with object keys sorted, so field order in the source
/// document does not change the id.
pub fn id_for_config(config: &MapConfig) -> Result<String, StoreError> {
    let canonical = serde_json::to_value(config)
        .and_then(|v| serde_json::to_vec(&v))
        .map_err(|e| StoreError::Corrupt(e.to_string()))?;
    Ok(blake3::hash(&canonical).to_hex().to_string())
}

/// Encodes `config` for a permalink.
pub fn encode_share(config: &MapConfig) -> Result<String, StoreError> {
    let json = serde_json::to_vec(config).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(json))
}

pub fn decode_share(text: &str) -> Result<MapConfig, StoreError> {
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(text.trim())
        .map_err(|e| StoreError::Corrupt(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt(e.to_string()))
}

/// Most recent first, then id.
fn sort_for_listing(maps: &mut [SavedMap]) {
    maps.sort_by(|a, b| {
        b.created_at_ms
            .cmp(&a.created_at_ms)
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[derive(Debug, Default)]
pub struct InMemoryMapStore {
    snapshot: StoreSnapshot,
}

impl InMemoryMapStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &StoreSnapshot {
        &self.snapshot
    }
}

impl MapStore for InMemoryMapStore {
    fn list(&self) -> Result<Vec<SavedMap>, StoreError> {
        let mut out: Vec<SavedMap> = self.snapshot.maps.values().cloned().collect();
        sort_for_listing(&mut out);
        Ok(out)
    }

    fn get(&self, id: &str) -> Result<Option<SavedMap>, StoreError> {
        Ok(self.snapshot.maps.get(id).cloned())
    }

    fn upsert(&mut self, map: SavedMap) -> Result<(), StoreError> {
        self.snapshot.maps.insert(map.id.clone(), map);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        Ok(self.snapshot.maps.remove(id).is_some())
    }
}

/// Saved maps kept as one JSON file each under a directory.
#[derive(Debug)]
pub struct DirMapStore {
    root: PathBuf,
}

impl DirMapStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn index_path(&self) -> PathBuf {
        self.root.join("index.json")
    }

    fn entry_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(path) {
            Ok(raw) if raw.trim().is_empty() => Ok(None),
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(format!("read {}: {e}", path.display()))),
        }
    }

    fn write(&self, path: &Path, raw: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)
            .map_err(|e| StoreError::Io(format!("create {}: {e}", self.root.display())))?;
        fs::write(path, raw).map_err(|e| StoreError::Io(format!("write {}: {e}", path.display())))
    }

    fn load_index(&self) -> Result<Vec<String>, StoreError> {
        let Some(raw) = Self::read_optional(&self.index_path())? else {
            return Ok(Vec::new());
        };
        let mut ids = serde_json::from_str::<Vec<String>>(&raw)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    fn save_index(&self, mut ids: Vec<String>) -> Result<(), StoreError> {
        ids.sort();
        ids.dedup();
        let raw = serde_json::to_string(&ids).map_err(|e| StoreError::Io(e.to_string()))?;
        self.write(&self.index_path(), &raw)
    }
}

impl MapStore for DirMapStore {
    fn list(&self) -> Result<Vec<SavedMap>, StoreError> {
        let mut out = Vec::new();
        for id in self.load_index()? {
            match self.get(&id)? {
                Some(map) => out.push(map),
                None => tracing::warn!("index lists {id} but its file is missing"),
            }
        }
        sort_for_listing(&mut out);
        Ok(out)
    }

    fn get(&self, id: &str) -> Result<Option<SavedMap>, StoreError> {
        let Some(raw) = Self::read_optional(&self.entry_path(id))? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::Corrupt(format!("{id}: {e}")))
    }

    fn upsert(&mut self, map: SavedMap) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(&map).map_err(|e| StoreError::Io(e.to_string()))?;
        self.write(&self.entry_path(&map.id), &raw)?;
        let mut ids = self.load_index()?;
        if !ids.iter().any(|x| x == &map.id) {
            ids.push(map.id.clone());
            self.save_index(ids)?;
        }
        tracing::debug!("saved map {} to {}", map.id, self.root.display());
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let path = self.entry_path(id);
        let existed = match fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(StoreError::Io(format!("remove {}: {e}", path.display()))),
        };
        let mut ids = self.load_index()?;
        let before = ids.len();
        ids.retain(|x| x != id);
        if ids.len() != before {
            self.save_index(ids)?;
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layers::{GroupOverride, Layer};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn config(extra_layer: &str) -> MapConfig {
        MapConfig::from_layers(vec![
            Layer::new("osm").in_group("background"),
            Layer::new(extra_layer).in_group("Default"),
        ])
        .with_groups(vec![GroupOverride::new("Default", true)])
    }

    #[test]
    fn ids_are_content_addressed() {
        let a = id_for_config(&config("roads")).unwrap();
        assert_eq!(a, id_for_config(&config("roads")).unwrap());
        assert_ne!(a, id_for_config(&config("rivers")).unwrap());
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn key_order_does_not_change_the_id() {
        let a: MapConfig = serde_json::from_str(
            r#"{"layers":[{"id":"a","group":"g","opacity":0.5,"format":"png"}]}"#,
        )
        .unwrap();
        let b: MapConfig = serde_json::from_str(
            r#"{"layers":[{"format":"png","opacity":0.5,"group":"g","id":"a"}]}"#,
        )
        .unwrap();
        assert_eq!(id_for_config(&a).unwrap(), id_for_config(&b).unwrap());
    }

    #[test]
    fn in_memory_lists_most_recent_first() {
        let mut store = InMemoryMapStore::new();
        let old = SavedMap::new("old", config("a"), 10).unwrap();
        let new = SavedMap::new("new", config("b"), 20).unwrap();
        store.upsert(old.clone()).unwrap();
        store.upsert(new.clone()).unwrap();
        let names: Vec<_> = store.list().unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["new", "old"]);

        assert_eq!(store.load(&old.id).unwrap(), old);
        assert!(store.delete(&old.id).unwrap());
        assert!(!store.delete(&old.id).unwrap());
        assert_eq!(store.load(&old.id), Err(StoreError::NotFound));
    }

    #[test]
    fn dir_store_round_trips_through_files() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("maps");
        let mut store = DirMapStore::new(&dir);
        assert!(store.list().unwrap().is_empty());
        assert!(!dir.exists());

        let saved = SavedMap::new("city", config("roads"), 5).unwrap();
        store.upsert(saved.clone()).unwrap();
        store.upsert(saved.clone()).unwrap();
        assert_eq!(store.list().unwrap(), vec![saved.clone()]);

        let reopened = DirMapStore::new(&dir);
        assert_eq!(reopened.get(&saved.id).unwrap(), Some(saved.clone()));

        assert!(store.delete(&saved.id).unwrap());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn dir_store_reports_corrupt_entries() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("bad.json"), "{not json").unwrap();
        fs::write(tmp.path().join("index.json"), r#"["bad"]"#).unwrap();
        let store = DirMapStore::new(tmp.path());
        assert!(matches!(store.get("bad"), Err(StoreError::Corrupt(_))));
        assert!(matches!(store.list(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn share_payload_round_trips() {
        let encoded = encode_share(&config("roads")).unwrap();
        assert!(!encoded.contains('='));
        assert_eq!(decode_share(&encoded).unwrap(), config("roads"));
        assert!(matches!(decode_share("%%%"), Err(StoreError::Corrupt(_))));
    }
}
