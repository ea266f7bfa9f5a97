/// Route module for discovered routes
///
/// Contains the route records and the pure normalizers applied to them
/// before registration:
/// - Method validation against the allow-list
/// - Schema defaulting
/// - Documentation tag derivation
pub mod definition;
pub mod method;
pub mod schema;

// Re-export commonly used types
pub use definition::{BoxFuture, HandlerFn, Route, RouteDefinition, RouteHandler};
pub use method::{fix_route_method, HttpMethod};
pub use schema::{fix_schema, fix_tags, TagContext};
