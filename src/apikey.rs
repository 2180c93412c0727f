//! Operator API keys.
//!
//! Keys live in a JSON file mapping `key -> operator name`. The file is
//! small and edited by hand, so we keep an in-memory copy and reload it
//! whenever the mtime changes. A missing or malformed file means no valid
//! keys, never a startup failure.

use std::{collections::HashMap, fs, path::PathBuf, time::SystemTime};

use parking_lot::RwLock;

#[derive(Default)]
pub struct OperatorKeys {
    path: PathBuf,
    cache: RwLock<(Option<SystemTime>, HashMap<String, String>)>,
}

impl OperatorKeys {
    pub fn load(path: Option<&str>) -> Self {
        let path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data/api_keys.json"));
        let this = Self {
            path,
            cache: RwLock::new((None, HashMap::new())),
        };
        this.refresh();
        this
    }

    fn refresh(&self) {
        let mtime = fs::metadata(&self.path).ok().and_then(|m| m.modified().ok());
        if mtime.is_some() && mtime == self.cache.read().0 {
            return;
        }
        let keys = read_keys(&self.path).unwrap_or_default();
        *self.cache.write() = (mtime, keys);
    }

    pub fn validate(&self, key: &str) -> bool {
        self.refresh();
        self.cache.read().1.contains_key(key)
    }

    pub fn operator(&self, key: &str) -> Option<String> {
        self.refresh();
        self.cache.read().1.get(key).cloned()
    }
}

fn read_keys(path: &PathBuf) -> Option<HashMap<String, String>> {
    let text = fs::read_to_string(path).ok()?;
    serde_json::from_str(&text).ok()
}
