//! Plugin descriptors for document-processing extensions.
//!
//! A descriptor is pure data: a name, an icon and an open `pluginConfig`
//! mapping. Only the plugin that consumes a descriptor knows the shape of its
//! configuration; it checks it by decoding into its own type with
//! [`PluginDescriptor::config`].
//!
//! # Example
//!
//! ```rust
//! use docecm::plugins::{PluginCatalog, builtin};
//!
//! let catalog = PluginCatalog::builtin();
//! let invoice = catalog.get(builtin::INVOICE_DETAILS).unwrap();
//! let config: builtin::InvoiceDetailsConfig = invoice.config().unwrap();
//! assert_eq!(config.db_table_name, "InvoiceDetails");
//! ```

pub mod builtin;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};

/// Identity and configuration of one plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginDescriptor {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    pub icon: String,
    #[serde(default)]
    pub plugin_config: Map<String, Value>,
}

impl PluginDescriptor {
    /// A non-object `config` yields an empty configuration.
    pub fn new(name: impl Into<String>, icon: impl Into<String>, config: Value) -> Self {
        let plugin_config = match config {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            id: 0,
            name: name.into(),
            icon: icon.into(),
            plugin_config,
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.plugin_config.get(key)
    }

    /// Decode the configuration into the plugin's own type.
    pub fn config<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.plugin_config.clone())).map_err(|err| {
            Error::Plugin {
                plugin: self.name.clone(),
                message: err.to_string(),
            }
        })
    }
}

/// Descriptors available to the plugin host, unique by name.
#[derive(Debug, Clone, Default)]
pub struct PluginCatalog {
    plugins: Vec<PluginDescriptor>,
}

impl PluginCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for plugin in builtin::all() {
            catalog.insert(plugin);
        }
        catalog
    }

    /// Built-ins plus the descriptors in a JSON array file; file entries
    /// replace built-ins of the same name.
    pub async fn with_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut catalog = Self::builtin();
        for plugin in load_descriptors(path.as_ref()).await? {
            catalog.insert(plugin);
        }
        Ok(catalog)
    }

    /// Add a descriptor, replacing one with the same name.
    pub fn insert(&mut self, plugin: PluginDescriptor) {
        match self.plugins.iter_mut().find(|p| p.name == plugin.name) {
            Some(existing) => *existing = plugin,
            None => self.plugins.push(plugin),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PluginDescriptor> {
        self.plugins.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.plugins.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

async fn load_descriptors(path: &Path) -> Result<Vec<PluginDescriptor>> {
    let text = tokio::fs::read_to_string(path).await?;
    let plugins: Vec<PluginDescriptor> = serde_json::from_str(&text)?;
    debug!(
        name: "plugins.loaded",
        path = %path.display(),
        count = plugins.len(),
        "Plugin descriptors loaded"
    );
    Ok(plugins)
}
