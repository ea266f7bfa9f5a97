//! Discovery of action files and registration of their routes

use crate::action::{ActionInstance, ActionLoader};
use crate::binder::add_action_route;
use crate::error::Result;
use crate::registry::RouteRegistry;
use crate::table::RouteTable;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Every file beneath any directory named `folder_name` under `root`
///
/// Sorted and free of duplicates (nested folders with the same name are
/// walked once). A missing `root` yields nothing.
pub fn list_subfolders_files_by_folder_name(root: impl AsRef<Path>, folder_name: &str) -> Vec<PathBuf> {
    let root = root.as_ref();
    if !root.exists() {
        return Vec::new();
    }

    let files: BTreeSet<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_dir() && entry.file_name() == folder_name)
        .flat_map(|dir| {
            WalkDir::new(dir.path())
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
        })
        .collect();

    files.into_iter().collect()
}

/// Register the routes of every action found under `root/**/folder_name/`
///
/// Each file is instantiated through `loader`. Controllers have their
/// `routes()` bound one by one with the action as handler; inert instances
/// are skipped. Instantiation, `routes()` and table failures abort.
pub async fn add_action_routes<T, L>(
    table: &mut T,
    registry: &RouteRegistry,
    loader: &L,
    root: impl AsRef<Path>,
    folder_name: &str,
    verbose: bool,
) -> Result<()>
where
    T: RouteTable + Send + ?Sized,
    L: ActionLoader + ?Sized,
{
    if verbose {
        info!(folder = folder_name, "adding action routes");
    }

    for action_path in list_subfolders_files_by_folder_name(root, folder_name) {
        if verbose {
            info!(path = %action_path.display(), "initializing action route");
        }

        match loader.instantiate(&action_path)? {
            ActionInstance::Controller(action) => {
                for config in action.routes().await? {
                    add_action_route(table, registry, &action, config, verbose)?;
                }
            }
            ActionInstance::Inert(name) => {
                if verbose {
                    warn!(action = %name, path = %action_path.display(), "action has no routes or controller, skipping");
                }
            }
        }
    }

    Ok(())
}
