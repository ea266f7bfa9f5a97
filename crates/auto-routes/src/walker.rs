// File: src/walker.rs
// Purpose: Walk a routes folder and bind every route module found in it

use crate::binder::add_route;
use crate::error::{AutoRouteError, Result};
use crate::loader::ModuleLoader;
use crate::path::clean_relative_path;
use crate::registry::RouteRegistry;
use crate::table::RouteTable;
use futures::future::{try_join_all, BoxFuture};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::info;

pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Options for one walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    /// Log every step
    pub verbose: bool,
    /// Route modules loaded concurrently within one folder
    pub batch_size: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl WalkOptions {
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// Register every route module under `folder`
///
/// `folder` is the routes root: each module's URL fragment is its path
/// relative to it (see [`clean_relative_path`]). Files the loader does not
/// handle are ignored. Within a folder, modules load in batches of
/// `batch_size`; sibling subfolders are walked concurrently. Each module's
/// routes are bound as soon as its batch has loaded.
///
/// Unreadable folders, failed loads and route table failures abort the walk.
/// Malformed exported values are skipped by the binder.
pub async fn add_routes<T, L>(
    table: &mut T,
    registry: &RouteRegistry,
    loader: &L,
    folder: impl AsRef<Path>,
    options: WalkOptions,
) -> Result<()>
where
    T: RouteTable + Send + ?Sized,
    L: ModuleLoader + ?Sized,
{
    let root = folder.as_ref().to_path_buf();
    let walk = RouteWalk {
        root_folder: root.to_string_lossy().into_owned(),
        loader,
        table: Mutex::new(table),
        registry,
        options,
    };
    walk.folder(root).await
}

/// A module loaded from disk along with its URL fragment
struct LoadedModule {
    path: PathBuf,
    relative_file_path: String,
    export: Value,
}

/// State threaded through one recursive walk
struct RouteWalk<'a, T: ?Sized, L: ?Sized> {
    root_folder: String,
    loader: &'a L,
    table: Mutex<&'a mut T>,
    registry: &'a RouteRegistry,
    options: WalkOptions,
}

impl<'a, T, L> RouteWalk<'a, T, L>
where
    T: RouteTable + Send + ?Sized,
    L: ModuleLoader + ?Sized,
{
    fn folder(&self, folder: PathBuf) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let (files, subfolders) = self.read_folder(&folder).await?;

            for batch in files.chunks(self.options.batch_size.max(1)) {
                let loaded = try_join_all(batch.iter().map(|(file, ext)| self.load(file, ext))).await?;
                for module in loaded {
                    self.bind(module).await?;
                }
            }

            try_join_all(subfolders.into_iter().map(|sub| self.folder(sub))).await?;
            Ok(())
        })
    }

    /// Route files (with their extension) and subfolders, both sorted
    async fn read_folder(&self, folder: &Path) -> Result<(Vec<(PathBuf, String)>, Vec<PathBuf>)> {
        let mut entries = fs::read_dir(folder)
            .await
            .map_err(|e| AutoRouteError::io(folder, e))?;

        let mut files = Vec::new();
        let mut subfolders = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AutoRouteError::io(folder, e))?
        {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| AutoRouteError::io(&path, e))?;

            if file_type.is_dir() {
                subfolders.push(path);
                continue;
            }

            let ext = path
                .extension()
                .and_then(|s| s.to_str())
                .map(str::to_string);
            match ext {
                Some(ext) if self.loader.handles(&ext) => files.push((path, ext)),
                _ => {}
            }
        }

        files.sort();
        subfolders.sort();
        Ok((files, subfolders))
    }

    async fn load(&self, path: &Path, ext: &str) -> Result<LoadedModule> {
        let relative_file_path = clean_relative_path(
            &self.root_folder,
            &path.to_string_lossy(),
            &format!(".{}", ext),
        );
        let export = self.loader.load(path).await?;

        Ok(LoadedModule {
            path: path.to_path_buf(),
            relative_file_path,
            export,
        })
    }

    async fn bind(&self, module: LoadedModule) -> Result<()> {
        let verbose = self.options.verbose;
        let routes = match module.export {
            Value::Array(routes) => routes,
            single => vec![single],
        };

        if verbose {
            info!(
                file = %module.path.display(),
                fragment = %module.relative_file_path,
                routes = routes.len(),
                "loaded route module"
            );
        }

        let mut table = self.table.lock().await;
        for route in routes {
            add_route(
                &mut **table,
                self.registry,
                route,
                &module.relative_file_path,
                verbose,
            )?;
        }
        Ok(())
    }
}
