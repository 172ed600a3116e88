//! Settings lookup
//!
//! Settings come from a VS Code style `settings.json` and from command line
//! overrides. Lookups go through `ConfigStore` so callers always see the
//! current value; nothing here caches.

use crate::{Error, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Settings section all keys live under
pub const SECTION: &str = "soldb";

pub const PYTHON_PATH_KEY: &str = "pythonPath";
pub const WALNUT_PATH_KEY: &str = "walnutPath";

pub const DEFAULT_PYTHON_PATH: &str = "python3";

/// Key/value settings lookup
pub trait ConfigStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Settings parsed from a JSON document
///
/// Accepts all three shapes editors produce:
///
/// ```text
/// { "soldb.pythonPath": "python3.11" }
/// { "soldb": { "pythonPath": "python3.11" } }
/// { "pythonPath": "python3.11" }
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonConfigStore {
    values: Map<String, Value>,
}

impl JsonConfigStore {
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            other => Err(Error::Config(format!(
                "Settings must be a JSON object, got: {}",
                other
            ))),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Cannot read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;
        debug!("Loaded settings from {}", path.display());
        Self::from_value(serde_json::from_str(&content)?)
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        self.values
            .get(&format!("{}.{}", SECTION, key))
            .or_else(|| {
                self.values
                    .get(SECTION)
                    .and_then(Value::as_object)
                    .and_then(|section| section.get(key))
            })
            .or_else(|| self.values.get(key))
    }
}

impl ConfigStore for JsonConfigStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.lookup(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// In-memory settings, used for command line overrides
#[derive(Debug, Clone, Default)]
pub struct MapConfigStore {
    values: HashMap<String, String>,
}

impl MapConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: Option<String>) -> Self {
        if let Some(value) = value {
            self.values.insert(key.to_string(), value);
        }
        self
    }
}

impl ConfigStore for MapConfigStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Stack of stores; the first one holding a key wins
#[derive(Default)]
pub struct LayeredConfigStore {
    layers: Vec<Box<dyn ConfigStore>>,
}

impl LayeredConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, store: impl ConfigStore + 'static) -> Self {
        self.layers.push(Box::new(store));
        self
    }
}

impl ConfigStore for LayeredConfigStore {
    fn get(&self, key: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.get(key))
    }
}

/// Adapter settings with defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub python_path: String,
    /// Root of a soldb checkout; `None` means search for one
    pub walnut_path: Option<String>,
}

impl Settings {
    pub fn read(store: &dyn ConfigStore) -> Self {
        let python_path = store
            .get(PYTHON_PATH_KEY)
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PYTHON_PATH.to_string());

        let walnut_path = store
            .get(WALNUT_PATH_KEY)
            .filter(|p| !p.is_empty())
            .map(|p| shellexpand::tilde(&p).into_owned());

        Self {
            python_path,
            walnut_path,
        }
    }
}
