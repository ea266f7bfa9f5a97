//! Schema defaults and documentation tags

use crate::route::RouteDefinition;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid word regex"));

const ACTION_TAG: &str = "ACTION";

/// What a route's default tag is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagContext<'a> {
    /// First word of the file's URL fragment
    Path(&'a str),
    /// Routes declared by an action carry the `ACTION` tag
    Action,
}

/// The route's schema, or an empty one
pub fn fix_schema(route: &RouteDefinition) -> Map<String, Value> {
    route.schema.clone().unwrap_or_default()
}

/// Documentation tags for a route
///
/// Declared `schema.tags` strings win and come back upper-cased, in order.
/// Non-string elements are dropped. Without any the tags are `[<context>, <METHOD>]`, where `<context>` is the first
/// word of the path fragment (or `ACTION`) and `<METHOD>` is empty when the
/// route declares none.
///
/// # Examples
///
/// ```
/// use auto_routes::route::{fix_tags, RouteDefinition, TagContext};
///
/// let route = RouteDefinition::default().method("post");
/// assert_eq!(fix_tags(&route, TagContext::Path("/api/users/profile")), vec!["API", "POST"]);
///
/// let route = RouteDefinition::default().tags(["user", "auth"]);
/// assert_eq!(fix_tags(&route, TagContext::Path("/api")), vec!["USER", "AUTH"]);
/// ```
pub fn fix_tags(route: &RouteDefinition, context: TagContext<'_>) -> Vec<String> {
    let declared: Vec<String> = route
        .schema
        .as_ref()
        .and_then(|schema| schema.get("tags"))
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_uppercase)
                .collect()
        })
        .unwrap_or_default();

    if !declared.is_empty() {
        return declared;
    }

    let first = match context {
        TagContext::Path(fragment) => WORD_REGEX
            .find(fragment)
            .map(|word| word.as_str().to_uppercase())
            .unwrap_or_default(),
        TagContext::Action => ACTION_TAG.to_string(),
    };
    let method = route
        .method
        .as_deref()
        .map(str::to_uppercase)
        .unwrap_or_default();

    vec![first, method]
}
