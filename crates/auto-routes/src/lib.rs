//! # Auto Routes
//!
//! Directory-driven route discovery for Axum applications:
//! - Route descriptors (`.json`, `.toml`) anywhere under a routes folder
//! - URL paths inferred from the descriptor's location (`routes/api/users.json` → `/api/users`)
//! - HTTP method validation with a GET default
//! - Documentation tags derived from the path when none are declared
//! - Class-style actions that declare their own routes
//! - A registry of everything registered, per method
//!
//! ## Path Inference
//!
//! A descriptor's declared `url` is appended to the fragment of its location
//! unless it already starts with it:
//!
//! - `routes/api/users.json` with `url = "/:id"` → `/api/users/:id`
//! - `routes/root.json` with `url = "/"` → `/`
//!
//! ## Example
//!
//! ```no_run
//! use auto_routes::{add_routes, AxumRouteTable, DescriptorLoader, RouteRegistry, WalkOptions};
//!
//! # async fn run() -> auto_routes::Result<()> {
//! let registry = RouteRegistry::new();
//! let mut table = AxumRouteTable::new().handler("users.show", |_req| async { "user" });
//!
//! add_routes(&mut table, &registry, &DescriptorLoader::new(), "routes", WalkOptions::default()).await?;
//!
//! println!("{}", registry.list());
//! let app: axum::Router = table.into_router();
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod action;
pub mod binder;
pub mod config;
pub mod error;
pub mod loader;
mod mount;
pub mod path;
pub mod registry;
pub mod route;
pub mod table;
pub mod walker;

// ============================================================================
// Re-exports
// ============================================================================

pub use action::{
    add_action_routes, list_subfolders_files_by_folder_name, ActionCatalog, ActionController,
    ActionInstance, ActionLoader, ActionRoutes,
};
pub use binder::{add_action_route, add_route, add_route_definition};
pub use config::AutoRoutesConfig;
pub use error::{AutoRouteError, Result};
pub use loader::{DescriptorLoader, ModuleLoader};
pub use mount::mount;
pub use path::{clean_relative_path, fix_url};
pub use registry::RouteRegistry;
pub use route::{
    fix_route_method, fix_schema, fix_tags, HttpMethod, Route, RouteDefinition, RouteHandler,
    TagContext,
};
pub use table::{AxumRouteTable, RouteTable};
pub use walker::{add_routes, WalkOptions};

// Re-export the framework the table builds on
pub use axum;
