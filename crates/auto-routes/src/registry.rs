// File: src/registry.rs
// Purpose: Record of every route handed to the route table, keyed by method

use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Method → URLs log of registered routes
///
/// The registry is a side-effect log: the binder records a route here right
/// after the route table accepted it. Construct one per application boot and
/// pass it by reference; `clear()` resets it between tests.
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: RwLock<BTreeMap<String, BTreeSet<String>>>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, BTreeSet<String>>> {
        self.routes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, BTreeSet<String>>> {
        self.routes.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a route; the method is upper-cased, duplicates collapse
    pub fn add(&self, method: &str, url: &str) {
        self.write()
            .entry(method.to_uppercase())
            .or_default()
            .insert(url.to_string());
    }

    /// Sorted methods that have at least one route
    pub fn get_methods(&self) -> Vec<String> {
        self.read()
            .keys()
            .filter(|method| !method.is_empty())
            .cloned()
            .collect()
    }

    /// Sorted URLs registered for `method` (case-insensitive)
    ///
    /// `None` for an empty method or one that was never recorded.
    pub fn get_routes(&self, method: &str) -> Option<Vec<String>> {
        if method.is_empty() {
            return None;
        }
        self.read()
            .get(&method.to_uppercase())
            .map(|urls| urls.iter().cloned().collect())
    }

    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    pub fn values(&self) -> Vec<Vec<String>> {
        self.read()
            .values()
            .map(|urls| urls.iter().cloned().collect())
            .collect()
    }

    /// Total number of recorded (method, url) pairs
    pub fn len(&self) -> usize {
        self.read().values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    /// `{ "GET": ["/a", "/b"], ... }`
    pub fn list(&self) -> Value {
        let routes = self.read();
        let listing: Map<String, Value> = routes
            .iter()
            .filter(|(method, _)| !method.is_empty())
            .map(|(method, urls)| {
                let urls = urls.iter().cloned().map(Value::String).collect();
                (method.clone(), Value::Array(urls))
            })
            .collect();
        Value::Object(listing)
    }

    /// Routes per method as a tree of URL segments with `true` leaves
    ///
    /// `/api/users/:id` becomes `{"api": {"users": {":id": true}}}`. When a URL
    /// is also the prefix of another one, the branch wins and the leaf is kept
    /// under the `""` key inside it. The root URL `/` maps to `"": true`.
    pub fn json(&self) -> Value {
        let routes = self.read();
        let tree: Map<String, Value> = routes
            .iter()
            .filter(|(method, _)| !method.is_empty())
            .map(|(method, urls)| {
                let mut apis = Map::new();
                for url in urls {
                    let segments: Vec<&str> = url.split('/').filter(|s| !s.is_empty()).collect();
                    insert_segments(&mut apis, &segments);
                }
                (method.clone(), Value::Object(apis))
            })
            .collect();
        Value::Object(tree)
    }
}

fn insert_segments(tree: &mut Map<String, Value>, segments: &[&str]) {
    match segments {
        [] => {
            tree.insert(String::new(), Value::Bool(true));
        }
        [last] => match tree.get_mut(*last) {
            Some(Value::Object(branch)) => {
                branch.insert(String::new(), Value::Bool(true));
            }
            _ => {
                tree.insert(last.to_string(), Value::Bool(true));
            }
        },
        [first, rest @ ..] => {
            let node = tree
                .entry(first.to_string())
                .or_insert_with(|| Value::Object(Map::new()));

            if !node.is_object() {
                let mut branch = Map::new();
                branch.insert(String::new(), node.take());
                *node = Value::Object(branch);
            }

            if let Value::Object(branch) = node {
                insert_segments(branch, rest);
            }
        }
    }
}
