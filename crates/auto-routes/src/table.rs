//! Route table seam and the Axum-backed implementation

use crate::error::{AutoRouteError, Result};
use crate::route::{BoxFuture, HandlerFn, HttpMethod, Route, RouteHandler};
use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use axum::routing::MethodRouter;
use axum::Router;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

/// The web framework's routing table as seen by the binder
pub trait RouteTable {
    /// Register one normalized route
    ///
    /// An error aborts the walk that produced the route.
    fn route(&mut self, route: Route) -> Result<()>;
}

/// Collects discovered routes into an [`axum::Router`]
///
/// Descriptor files refer to handlers by name; register those names with
/// [`AxumRouteTable::handler`] before walking. Routes sharing a URL are merged
/// into one `MethodRouter`. A URL that axum's path matcher would refuse, such
/// as `/users/:name` next to an existing `/users/:id`, is rejected here rather
/// than when the router is built.
///
/// ```
/// use auto_routes::route::{HttpMethod, Route, RouteHandler};
/// use auto_routes::table::{AxumRouteTable, RouteTable};
///
/// let mut table = AxumRouteTable::new().handler("health", |_req| async { "ok" });
/// table
///     .route(Route {
///         method: HttpMethod::Get,
///         url: "/health".into(),
///         schema: Default::default(),
///         handler: Some(RouteHandler::Named("health".into())),
///         extra: Default::default(),
///     })
///     .unwrap();
/// let _app: axum::Router = table.into_router();
/// ```
#[derive(Default)]
pub struct AxumRouteTable {
    handlers: HashMap<String, HandlerFn>,
    routes: BTreeMap<String, MethodRouter>,
    registered: HashSet<(HttpMethod, String)>,
    matcher: matchit::Router<()>,
}

impl AxumRouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a handler available to descriptors under `name`
    pub fn handler<F, Fut, R>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        let handler: HandlerFn = Arc::new(move |req: Request| -> BoxFuture<Response> {
            let fut = handler(req);
            Box::pin(async move { fut.await.into_response() })
        });
        self.handlers.insert(name.into(), handler);
        self
    }

    /// URLs with at least one registered method, sorted
    pub fn paths(&self) -> Vec<&str> {
        self.routes.keys().map(String::as_str).collect()
    }

    pub fn into_router(self) -> Router {
        self.routes
            .into_iter()
            .fold(Router::new(), |router, (url, method_router)| {
                router.route(&url, method_router)
            })
    }

    fn resolve(&self, route: &Route) -> Result<HandlerFn> {
        match &route.handler {
            Some(RouteHandler::Named(name)) => {
                self.handlers
                    .get(name)
                    .cloned()
                    .ok_or_else(|| AutoRouteError::UnknownHandler {
                        handler: name.clone(),
                        method: route.method.to_string(),
                        url: route.url.clone(),
                    })
            }
            Some(RouteHandler::Action(action)) => {
                let action = action.clone();
                Ok(Arc::new(move |req: Request| -> BoxFuture<Response> {
                    let action = action.clone();
                    Box::pin(async move { action.as_controller(req).await })
                }))
            }
            None => Err(AutoRouteError::MissingHandler {
                method: route.method.to_string(),
                url: route.url.clone(),
            }),
        }
    }
}

impl RouteTable for AxumRouteTable {
    fn route(&mut self, route: Route) -> Result<()> {
        if !route.url.starts_with('/') {
            return Err(AutoRouteError::Registration {
                method: route.method.to_string(),
                url: route.url,
                reason: "path must start with '/'".to_string(),
            });
        }

        let key = (route.method, route.url.clone());
        if self.registered.contains(&key) {
            return Err(AutoRouteError::Registration {
                method: route.method.to_string(),
                url: route.url,
                reason: "already registered".to_string(),
            });
        }

        let handler = self.resolve(&route)?;

        // axum inserts a path into its matcher once and merges later methods
        if !self.routes.contains_key(&route.url) {
            self.matcher
                .insert(route.url.as_str(), ())
                .map_err(|e| AutoRouteError::Registration {
                    method: route.method.to_string(),
                    url: route.url.clone(),
                    reason: e.to_string(),
                })?;
        }

        let endpoint = move |req: Request| {
            let handler = handler.clone();
            async move { handler(req).await }
        };

        let method_router = self.routes.remove(&route.url).unwrap_or_default();
        self.routes
            .insert(route.url, method_router.on(route.method.filter(), endpoint));
        self.registered.insert(key);

        Ok(())
    }
}
