//! Class-style controller actions
//!
//! An action declares its own route definitions and serves every one of them
//! through a single `as_controller` entry point. Action files are discovered
//! on disk; an [`ActionLoader`] turns each file into an [`ActionInstance`].

use crate::error::{AutoRouteError, Result};
use crate::route::RouteDefinition;
use async_trait::async_trait;
use axum::extract::Request;
use axum::response::Response;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

pub mod walker;

pub use walker::{add_action_routes, list_subfolders_files_by_folder_name};

/// A controller that declares and serves its own routes
#[async_trait]
pub trait ActionController: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Route definitions this action serves
    async fn routes(&self) -> Result<ActionRoutes>;

    /// Handle a request for any of the declared routes
    async fn as_controller(&self, request: Request) -> Response;
}

/// One route definition or several
#[derive(Debug, Clone)]
pub enum ActionRoutes {
    One(RouteDefinition),
    Many(Vec<RouteDefinition>),
}

impl From<RouteDefinition> for ActionRoutes {
    fn from(route: RouteDefinition) -> Self {
        ActionRoutes::One(route)
    }
}

impl From<Vec<RouteDefinition>> for ActionRoutes {
    fn from(routes: Vec<RouteDefinition>) -> Self {
        ActionRoutes::Many(routes)
    }
}

impl IntoIterator for ActionRoutes {
    type Item = RouteDefinition;
    type IntoIter = std::vec::IntoIter<RouteDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            ActionRoutes::One(route) => vec![route].into_iter(),
            ActionRoutes::Many(routes) => routes.into_iter(),
        }
    }
}

/// What an action file instantiates to
#[derive(Clone)]
pub enum ActionInstance {
    /// Declares routes and serves them
    Controller(Arc<dyn ActionController>),
    /// Lacks routes or a controller entry point; skipped
    Inert(String),
}

impl ActionInstance {
    pub fn controller<A: ActionController + 'static>(action: A) -> Self {
        ActionInstance::Controller(Arc::new(action))
    }

    pub fn inert(name: impl Into<String>) -> Self {
        ActionInstance::Inert(name.into())
    }
}

/// Instantiates the action defined by one discovered file
pub trait ActionLoader: Send + Sync {
    fn instantiate(&self, path: &Path) -> Result<ActionInstance>;
}

type ActionFactory = Box<dyn Fn() -> ActionInstance + Send + Sync>;

/// Action factories keyed by file stem
///
/// `actions/users/create-user.rs` is instantiated by the factory registered as
/// `create-user`. A discovered file without a factory is a load failure.
///
/// ```
/// use auto_routes::action::{ActionCatalog, ActionInstance};
///
/// let catalog = ActionCatalog::new().register("legacy", || ActionInstance::inert("legacy"));
/// assert!(catalog.contains("legacy"));
/// ```
#[derive(Default)]
pub struct ActionCatalog {
    factories: HashMap<String, ActionFactory>,
}

impl ActionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(mut self, stem: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> ActionInstance + Send + Sync + 'static,
    {
        self.factories.insert(stem.into(), Box::new(factory));
        self
    }

    /// Register a controller constructed fresh for every instantiation
    pub fn controller<A, F>(self, stem: impl Into<String>, make: F) -> Self
    where
        A: ActionController + 'static,
        F: Fn() -> A + Send + Sync + 'static,
    {
        self.register(stem, move || ActionInstance::controller(make()))
    }

    pub fn contains(&self, stem: &str) -> bool {
        self.factories.contains_key(stem)
    }
}

impl ActionLoader for ActionCatalog {
    fn instantiate(&self, path: &Path) -> Result<ActionInstance> {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| self.factories.get(stem))
            .map(|factory| factory())
            .ok_or_else(|| AutoRouteError::UnknownAction(path.to_path_buf()))
    }
}
