//! Route module loading
//!
//! A route module is a file under the routes folder whose exported value is a
//! route object, an array of route objects, or anything else (which the binder
//! rejects). Loading is behind [`ModuleLoader`] so applications can plug in
//! their own formats.

use crate::error::{AutoRouteError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use tokio::fs;

/// Loads the exported value of one route module
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    /// File extensions (without the dot) this loader handles
    fn extensions(&self) -> &[&str];

    /// Read and decode one module
    ///
    /// Failures abort the walk that requested the module.
    async fn load(&self, path: &Path) -> Result<Value>;

    fn handles(&self, ext: &str) -> bool {
        self.extensions().contains(&ext)
    }
}

/// Loads declarative route descriptors written in JSON or TOML
///
/// ```toml
/// # routes/api/users.toml
/// url = "/:id"
/// method = "get"
/// handler = "users.show"
/// ```
///
/// JSON files may export an object or an array. TOML has no top-level arrays,
/// so a TOML file holding nothing but a `[[routes]]` array exports that array.
/// In either format an object whose only key is `default` exports its value.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptorLoader;

impl DescriptorLoader {
    pub const EXTENSIONS: [&'static str; 2] = ["json", "toml"];

    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ModuleLoader for DescriptorLoader {
    fn extensions(&self) -> &[&str] {
        &Self::EXTENSIONS
    }

    async fn load(&self, path: &Path) -> Result<Value> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| AutoRouteError::io(path, e))?;

        let value = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| AutoRouteError::parse(path, e))?
            }
            Some("toml") => {
                let document: toml::Value =
                    toml::from_str(&content).map_err(|e| AutoRouteError::parse(path, e))?;
                let value =
                    serde_json::to_value(document).map_err(|e| AutoRouteError::parse(path, e))?;
                unwrap_key(value, "routes", Value::is_array)
            }
            other => {
                return Err(AutoRouteError::Load {
                    path: path.to_path_buf(),
                    reason: format!("unsupported extension {:?}", other.unwrap_or("")),
                })
            }
        };

        Ok(unwrap_key(value, "default", |_| true))
    }
}

/// Replace `{key: inner}` with `inner` when `key` is the only key
fn unwrap_key(value: Value, key: &str, accept: fn(&Value) -> bool) -> Value {
    match value {
        Value::Object(mut map) if map.len() == 1 && map.get(key).is_some_and(accept) => {
            map.remove(key).unwrap_or(Value::Null)
        }
        other => other,
    }
}
