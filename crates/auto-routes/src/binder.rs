// File: src/binder.rs
// Purpose: Normalize discovered routes, hand them to the route table, record them

use crate::action::ActionController;
use crate::error::Result;
use crate::path::{fix_url, starts_with_fragment};
use crate::registry::RouteRegistry;
use crate::route::{
    fix_route_method, fix_schema, fix_tags, Route, RouteDefinition, RouteHandler, TagContext,
};
use crate::table::RouteTable;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Bind one value exported by a route module
///
/// Anything but a route object (arrays, strings, numbers, null) is skipped,
/// as is an object whose fields have the wrong types. Only a failure of the
/// route table itself is returned.
pub fn add_route<T>(
    table: &mut T,
    registry: &RouteRegistry,
    route: Value,
    relative_file_path: &str,
    verbose: bool,
) -> Result<()>
where
    T: RouteTable + ?Sized,
{
    let object = match route {
        Value::Object(object) => object,
        other => {
            if verbose {
                warn!(path = relative_file_path, route = %other, "route problem: not an object");
            }
            return Ok(());
        }
    };

    match RouteDefinition::from_object(object) {
        Ok(definition) => {
            add_route_definition(table, registry, definition, relative_file_path, verbose)
        }
        Err(e) => {
            if verbose {
                warn!(path = relative_file_path, error = %e, "route problem: malformed route");
            }
            Ok(())
        }
    }
}

/// Bind a typed route found at `relative_file_path`
///
/// The URL defaults to `/` and is prefixed with the fragment unless it
/// already starts with it; method, schema and tags are normalized.
pub fn add_route_definition<T>(
    table: &mut T,
    registry: &RouteRegistry,
    mut route: RouteDefinition,
    relative_file_path: &str,
    verbose: bool,
) -> Result<()>
where
    T: RouteTable + ?Sized,
{
    let url = route.url.take().unwrap_or_else(|| {
        if verbose {
            warn!(path = relative_file_path, "missing url, defaulting to /");
        }
        "/".to_string()
    });
    let url = if starts_with_fragment(&url, relative_file_path) {
        url
    } else {
        fix_url(&url, relative_file_path)
    };

    let method = fix_route_method(route.method.as_deref(), verbose);
    route.method = Some(method.to_string());

    let mut schema = fix_schema(&route);
    let tags = fix_tags(&route, TagContext::Path(relative_file_path));
    schema.insert("tags".to_string(), Value::from(tags));

    register(
        table,
        registry,
        Route {
            method,
            url,
            schema,
            handler: route.handler,
            extra: route.extra,
        },
        verbose,
    )
}

/// Bind one route declared by an action
///
/// The action's `as_controller` becomes the handler, replacing whatever the
/// config carried. Action URLs are taken as declared.
pub fn add_action_route<T>(
    table: &mut T,
    registry: &RouteRegistry,
    action: &Arc<dyn ActionController>,
    mut config: RouteDefinition,
    verbose: bool,
) -> Result<()>
where
    T: RouteTable + ?Sized,
{
    let url = config.url.take().unwrap_or_else(|| {
        if verbose {
            warn!(action = action.name(), "missing url, defaulting to /");
        }
        "/".to_string()
    });

    let method = fix_route_method(config.method.as_deref(), verbose);
    config.method = Some(method.to_string());

    let mut schema = fix_schema(&config);
    schema.insert(
        "tags".to_string(),
        Value::from(fix_tags(&config, TagContext::Action)),
    );

    register(
        table,
        registry,
        Route {
            method,
            url,
            schema,
            handler: Some(RouteHandler::Action(action.clone())),
            extra: config.extra,
        },
        verbose,
    )
}

fn register<T>(table: &mut T, registry: &RouteRegistry, route: Route, verbose: bool) -> Result<()>
where
    T: RouteTable + ?Sized,
{
    let method = route.method;
    let url = route.url.clone();

    table.route(route)?;
    registry.add(method.as_str(), &url);

    debug!(%method, %url, "registered route");
    if verbose {
        info!(%method, %url, "added route");
    }
    Ok(())
}
