//! Route records as declared by descriptors and actions, and as registered

use crate::action::ActionController;
use crate::route::HttpMethod;
use axum::extract::Request;
use axum::response::Response;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Type-erased request handler stored by name in a route table
pub type HandlerFn = Arc<dyn Fn(Request) -> BoxFuture<Response> + Send + Sync>;

/// Where a route's requests go
#[derive(Clone)]
pub enum RouteHandler {
    /// Handler registered under this name with the route table
    Named(String),
    /// The owning action's `as_controller`
    Action(Arc<dyn ActionController>),
}

impl RouteHandler {
    /// Whether this handler dispatches to exactly this action instance
    pub fn is_action(&self, action: &Arc<dyn ActionController>) -> bool {
        match self {
            RouteHandler::Action(own) => Arc::ptr_eq(own, action),
            RouteHandler::Named(_) => false,
        }
    }
}

impl fmt::Debug for RouteHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteHandler::Named(name) => f.debug_tuple("Named").field(name).finish(),
            RouteHandler::Action(action) => f.debug_tuple("Action").field(&action.name()).finish(),
        }
    }
}

/// A route as declared, before normalization
///
/// Every field may be missing; the binder fills in `url`, `method` and
/// `schema`. Keys it does not know are kept in `extra` and passed through to
/// the route table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteDefinition {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub method: Option<String>,

    #[serde(default)]
    pub schema: Option<Map<String, Value>>,

    #[serde(default, deserialize_with = "named_handler")]
    pub handler: Option<RouteHandler>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RouteDefinition {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn handler(mut self, name: impl Into<String>) -> Self {
        self.handler = Some(RouteHandler::Named(name.into()));
        self
    }

    pub fn schema(mut self, schema: Map<String, Value>) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags = tags.into_iter().map(|t| Value::String(t.into())).collect();
        self.schema
            .get_or_insert_with(Map::new)
            .insert("tags".to_string(), Value::Array(tags));
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Decode a route object exported by a descriptor file
    pub fn from_object(object: Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(object))
    }
}

/// A normalized route ready for the route table
#[derive(Debug, Clone)]
pub struct Route {
    pub method: HttpMethod,
    pub url: String,
    pub schema: Map<String, Value>,
    pub handler: Option<RouteHandler>,
    pub extra: Map<String, Value>,
}

impl Route {
    /// Documentation tags attached to `schema.tags`
    pub fn tags(&self) -> Vec<&str> {
        self.schema
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn named_handler<'de, D>(deserializer: D) -> Result<Option<RouteHandler>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(RouteHandler::Named))
}
