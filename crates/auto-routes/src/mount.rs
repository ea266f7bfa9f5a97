//! One-call discovery driven by [`AutoRoutesConfig`]

use crate::action::{add_action_routes, ActionLoader};
use crate::config::AutoRoutesConfig;
use crate::error::Result;
use crate::loader::ModuleLoader;
use crate::registry::RouteRegistry;
use crate::table::RouteTable;
use crate::walker::add_routes;
use tracing::info;

/// Walk the configured routes folder, then the configured action folders
pub async fn mount<T, L, A>(
    config: &AutoRoutesConfig,
    table: &mut T,
    registry: &RouteRegistry,
    loader: &L,
    actions: &A,
) -> Result<()>
where
    T: RouteTable + Send + ?Sized,
    L: ModuleLoader + ?Sized,
    A: ActionLoader + ?Sized,
{
    add_routes(table, registry, loader, &config.routes.dir, config.walk_options()).await?;

    if let Some(action_config) = &config.actions {
        add_action_routes(
            table,
            registry,
            actions,
            &action_config.root,
            &action_config.folder,
            config.verbose,
        )
        .await?;
    }

    info!(
        routes = registry.len(),
        methods = ?registry.get_methods(),
        "auto routes mounted"
    );
    Ok(())
}
