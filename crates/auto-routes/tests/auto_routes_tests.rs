//! Integration tests for auto-routes
//!
//! Each test builds a routes tree on disk, walks it, and checks what reached
//! the route table and the registry.

use async_trait::async_trait;
use auto_routes::axum::body::Body;
use auto_routes::axum::extract::Request;
use auto_routes::axum::http::StatusCode;
use auto_routes::axum::response::{IntoResponse, Response};
use auto_routes::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tower::ServiceExt;

/// Route table that keeps everything it is given
#[derive(Default)]
struct RecordingTable {
    routes: Vec<Route>,
}

impl RouteTable for RecordingTable {
    fn route(&mut self, route: Route) -> auto_routes::Result<()> {
        self.routes.push(route);
        Ok(())
    }
}

impl RecordingTable {
    fn registered(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<_> = self
            .routes
            .iter()
            .map(|r| (r.method.to_string(), r.url.clone()))
            .collect();
        pairs.sort();
        pairs
    }
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

async fn walk(root: &Path, table: &mut RecordingTable, registry: &RouteRegistry) -> auto_routes::Result<()> {
    add_routes(table, registry, &DescriptorLoader::new(), root, WalkOptions::default()).await
}

fn pair(method: &str, url: &str) -> (String, String) {
    (method.to_string(), url.to_string())
}

// ============================================================================
// Route folders
// ============================================================================

#[tokio::test]
async fn test_nested_file_infers_url_and_method() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "api/users.json", r#"{"url": "/:id", "method": "get", "handler": "users.show"}"#);

    let mut table = RecordingTable::default();
    let registry = RouteRegistry::new();
    walk(dir.path(), &mut table, &registry).await.unwrap();

    assert_eq!(table.registered(), vec![pair("GET", "/api/users/:id")]);
    assert_eq!(table.routes[0].tags(), vec!["API", "GET"]);
    assert!(registry
        .get_routes("GET")
        .unwrap()
        .contains(&"/api/users/:id".to_string()));
}

#[tokio::test]
async fn test_array_export_registers_each_route() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "test.json",
        r#"[{"method": "GET", "url": "/test1"}, {"method": "POST", "url": "/test2"}]"#,
    );

    let mut table = RecordingTable::default();
    let registry = RouteRegistry::new();
    walk(dir.path(), &mut table, &registry).await.unwrap();

    assert_eq!(
        table.registered(),
        vec![pair("GET", "/test/test1"), pair("POST", "/test/test2")]
    );
    assert_eq!(registry.get_methods(), vec!["GET", "POST"]);
}

#[tokio::test]
async fn test_toml_descriptors() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "auth/login.toml", "url = \"/\"\nmethod = \"post\"\n");
    write(
        dir.path(),
        "auth/sso.toml",
        "[[routes]]\nurl = \"/start\"\n\n[[routes]]\nurl = \"/callback\"\n",
    );

    let mut table = RecordingTable::default();
    let registry = RouteRegistry::new();
    walk(dir.path(), &mut table, &registry).await.unwrap();

    assert_eq!(
        table.registered(),
        vec![
            pair("GET", "/auth/sso/callback"),
            pair("GET", "/auth/sso/start"),
            pair("POST", "/auth/login"),
        ]
    );
}

#[tokio::test]
async fn test_root_file_maps_to_root() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "root.json", r#"{"url": "/"}"#);
    write(dir.path(), "root.toml", "url = \"/health\"\n");

    let mut table = RecordingTable::default();
    let registry = RouteRegistry::new();
    walk(dir.path(), &mut table, &registry).await.unwrap();

    assert_eq!(table.registered(), vec![pair("GET", "/"), pair("GET", "/health")]);
    assert_eq!(registry.json(), json!({ "GET": { "": true, "health": true } }));
}

#[tokio::test]
async fn test_non_object_export_is_skipped() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "bad.json", r#""just a string""#);
    write(dir.path(), "numbers.json", "[1, 2, 3]");

    let mut table = RecordingTable::default();
    let registry = RouteRegistry::new();
    walk(dir.path(), &mut table, &registry).await.unwrap();

    assert!(table.routes.is_empty());
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_unhandled_files_are_ignored() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "valid.json", r#"{"url": "/valid"}"#);
    write(dir.path(), "invalid.txt", "This is not a route file");
    write(dir.path(), "README.md", "# Documentation");
    write(dir.path(), "data.xml", "<root><data>test</data></root>");

    let mut table = RecordingTable::default();
    let registry = RouteRegistry::new();
    walk(dir.path(), &mut table, &registry).await.unwrap();

    assert_eq!(table.registered(), vec![pair("GET", "/valid/valid")]);
}

#[tokio::test]
async fn test_empty_directory() {
    let dir = TempDir::new().unwrap();

    let mut table = RecordingTable::default();
    let registry = RouteRegistry::new();
    walk(dir.path(), &mut table, &registry).await.unwrap();

    assert!(table.routes.is_empty());
}

#[tokio::test]
async fn test_subdirectories_are_walked() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "main.json", r#"{"url": "/"}"#);
    write(dir.path(), "api/sub.json", r#"{"url": "/"}"#);
    write(dir.path(), "api/v1/deep/leaf.json", r#"{"url": "/:id", "method": "delete"}"#);
    write(dir.path(), "web/page.json", r#"{"url": "/"}"#);

    let mut table = RecordingTable::default();
    let registry = RouteRegistry::new();
    walk(dir.path(), &mut table, &registry).await.unwrap();

    assert_eq!(
        table.registered(),
        vec![
            pair("DELETE", "/api/v1/deep/leaf/:id"),
            pair("GET", "/api/sub"),
            pair("GET", "/main"),
            pair("GET", "/web/page"),
        ]
    );
}

#[tokio::test]
async fn test_every_file_registered_once_across_batches() {
    let dir = TempDir::new().unwrap();
    for i in 0..23 {
        write(dir.path(), &format!("items/item{:02}.json", i), r#"{"url": "/"}"#);
    }
    for i in 0..5 {
        write(dir.path(), &format!("other/o{}.json", i), r#"{"url": "/", "method": "put"}"#);
    }

    let mut table = RecordingTable::default();
    let registry = RouteRegistry::new();
    let options = WalkOptions::default().batch_size(4);
    add_routes(&mut table, &registry, &DescriptorLoader::new(), dir.path(), options)
        .await
        .unwrap();

    assert_eq!(table.routes.len(), 28);
    assert_eq!(registry.get_routes("GET").map(|r| r.len()), Some(23));
    assert_eq!(registry.get_routes("PUT").map(|r| r.len()), Some(5));

    let mut urls: Vec<_> = table.routes.iter().map(|r| r.url.clone()).collect();
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), 28);
}

#[tokio::test]
async fn test_load_failure_aborts_walk() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "broken.json", "{ not json");

    let mut table = RecordingTable::default();
    let registry = RouteRegistry::new();
    let err = walk(dir.path(), &mut table, &registry).await.unwrap_err();

    assert!(matches!(err, AutoRouteError::Parse { .. }));
    assert!(table.routes.is_empty());
}

#[tokio::test]
async fn test_missing_routes_folder_fails() {
    let dir = TempDir::new().unwrap();

    let mut table = RecordingTable::default();
    let registry = RouteRegistry::new();
    let err = walk(&dir.path().join("absent"), &mut table, &registry)
        .await
        .unwrap_err();

    assert!(matches!(err, AutoRouteError::Io { .. }));
}

#[tokio::test]
async fn test_verbose_walk_with_subscriber() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let dir = TempDir::new().unwrap();
    write(dir.path(), "api/users.json", r#"[{"method": "bogus"}, "oops"]"#);

    let mut table = RecordingTable::default();
    let registry = RouteRegistry::new();
    let options = WalkOptions::default().verbose(true);
    add_routes(&mut table, &registry, &DescriptorLoader::new(), dir.path(), options)
        .await
        .unwrap();

    assert_eq!(table.registered(), vec![pair("GET", "/api/users")]);
}

// ============================================================================
// Axum table
// ============================================================================

#[tokio::test]
async fn test_discovered_routes_are_served() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "api/users.json", r#"{"url": "/:id", "handler": "users.show"}"#);
    write(dir.path(), "api/users.toml", "url = \"/\"\nmethod = \"post\"\nhandler = \"users.create\"\n");

    let mut table = AxumRouteTable::new()
        .handler("users.show", |_req| async { "user" })
        .handler("users.create", |_req| async { StatusCode::CREATED });
    let registry = RouteRegistry::new();
    add_routes(&mut table, &registry, &DescriptorLoader::new(), dir.path(), WalkOptions::default())
        .await
        .unwrap();

    let app = table.into_router();
    let res = app
        .clone()
        .oneshot(request("GET", "/api/users/42"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.oneshot(request("POST", "/api/users")).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_unknown_handler_aborts_walk() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "api/users.json", r#"{"url": "/:id", "handler": "nowhere"}"#);

    let mut table = AxumRouteTable::new();
    let registry = RouteRegistry::new();
    let err = add_routes(&mut table, &registry, &DescriptorLoader::new(), dir.path(), WalkOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AutoRouteError::UnknownHandler { .. }));
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_conflicting_sibling_patterns_abort_walk() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "api/users.json", r#"{"url": "/:id", "handler": "users.show"}"#);
    write(
        dir.path(),
        "api/users.toml",
        "url = \"/:name\"\nmethod = \"post\"\nhandler = \"users.rename\"\n",
    );

    let mut table = AxumRouteTable::new()
        .handler("users.show", |_req| async { "user" })
        .handler("users.rename", |_req| async { "renamed" });
    let registry = RouteRegistry::new();
    let err = add_routes(&mut table, &registry, &DescriptorLoader::new(), dir.path(), WalkOptions::default())
        .await
        .unwrap_err();

    match err {
        AutoRouteError::Registration { method, url, .. } => {
            assert_eq!(method, "POST");
            assert_eq!(url, "/api/users/:name");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(registry.list(), json!({ "GET": ["/api/users/:id"] }));

    let res = table
        .into_router()
        .oneshot(request("GET", "/api/users/9"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

fn request(method: &str, uri: &str) -> Request {
    auto_routes::axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// ============================================================================
// Actions
// ============================================================================

struct MultiAction;

#[async_trait]
impl ActionController for MultiAction {
    async fn routes(&self) -> auto_routes::Result<ActionRoutes> {
        Ok(vec![
            RouteDefinition::new("/multi1").method("GET"),
            RouteDefinition::new("/multi2").method("POST"),
        ]
        .into())
    }

    async fn as_controller(&self, request: Request) -> Response {
        format!("multi {}", request.uri().path()).into_response()
    }
}

struct SingleAction;

#[async_trait]
impl ActionController for SingleAction {
    async fn routes(&self) -> auto_routes::Result<ActionRoutes> {
        Ok(RouteDefinition::new("/single").tags(["single"]).into())
    }

    async fn as_controller(&self, _request: Request) -> Response {
        StatusCode::ACCEPTED.into_response()
    }
}

struct FailingAction;

#[async_trait]
impl ActionController for FailingAction {
    async fn routes(&self) -> auto_routes::Result<ActionRoutes> {
        Err(AutoRouteError::Action {
            action: self.name().to_string(),
            reason: "no database".into(),
        })
    }

    async fn as_controller(&self, _request: Request) -> Response {
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

fn catalog() -> ActionCatalog {
    ActionCatalog::new()
        .controller("multi-action", || MultiAction)
        .controller("single-action", || SingleAction)
        .register("no-controller-action", || ActionInstance::inert("NoControllerAction"))
}

#[tokio::test]
async fn test_action_with_two_configs_shares_handler() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "test-actions/multi/multi-action.rs", "");

    let mut table = RecordingTable::default();
    let registry = RouteRegistry::new();
    add_action_routes(&mut table, &registry, &catalog(), dir.path(), "test-actions", false)
        .await
        .unwrap();

    assert_eq!(table.routes.len(), 2);
    let first = match &table.routes[0].handler {
        Some(RouteHandler::Action(action)) => action.clone(),
        other => panic!("expected action handler, got {:?}", other),
    };
    assert!(table.routes[1].handler.as_ref().unwrap().is_action(&first));
    assert_eq!(table.routes[0].tags(), vec!["ACTION", "GET"]);
    assert_eq!(table.routes[1].tags(), vec!["ACTION", "POST"]);
    assert_eq!(registry.list(), json!({ "GET": ["/multi1"], "POST": ["/multi2"] }));
}

#[tokio::test]
async fn test_inert_action_is_skipped() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "actions/no-controller/no-controller-action.rs", "");
    write(dir.path(), "actions/single/single-action.rs", "");

    let mut table = RecordingTable::default();
    let registry = RouteRegistry::new();
    add_action_routes(&mut table, &registry, &catalog(), dir.path(), "actions", true)
        .await
        .unwrap();

    assert_eq!(table.registered(), vec![pair("GET", "/single")]);
    assert_eq!(table.routes[0].tags(), vec!["SINGLE"]);
}

#[tokio::test]
async fn test_empty_action_folder() {
    let dir = TempDir::new().unwrap();

    let mut table = RecordingTable::default();
    let registry = RouteRegistry::new();
    add_action_routes(&mut table, &registry, &catalog(), dir.path(), "nonexistent-action", false)
        .await
        .unwrap();

    assert!(table.routes.is_empty());
}

#[tokio::test]
async fn test_unknown_or_failing_action_aborts() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "actions/mystery.rs", "");

    let mut table = RecordingTable::default();
    let registry = RouteRegistry::new();
    let err = add_action_routes(&mut table, &registry, &catalog(), dir.path(), "actions", false)
        .await
        .unwrap_err();
    assert!(matches!(err, AutoRouteError::UnknownAction(_)));

    let failing = ActionCatalog::new().controller("mystery", || FailingAction);
    let err = add_action_routes(&mut table, &registry, &failing, dir.path(), "actions", false)
        .await
        .unwrap_err();
    assert!(matches!(err, AutoRouteError::Action { .. }));
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_action_routes_are_served() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/actions/multi-action.rs", "");

    let mut table = AxumRouteTable::new();
    let registry = RouteRegistry::new();
    add_action_routes(&mut table, &registry, &catalog(), dir.path().join("src"), "actions", false)
        .await
        .unwrap();

    let res = table
        .into_router()
        .oneshot(request("POST", "/multi2"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

// ============================================================================
// Mount
// ============================================================================

#[tokio::test]
async fn test_mount_from_config() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "routes/api/users.json", r#"{"url": "/:id"}"#);
    write(dir.path(), "src/users/actions/single-action.rs", "");

    let config_path = dir.path().join("auto-routes.toml");
    let config_toml = format!(
        "[routes]\ndir = {:?}\nbatch_size = 2\n\n[actions]\nroot = {:?}\n",
        dir.path().join("routes"),
        dir.path().join("src"),
    );
    fs::write(&config_path, config_toml).unwrap();
    let config = AutoRoutesConfig::load(&config_path).unwrap();

    let mut table = RecordingTable::default();
    let registry = RouteRegistry::new();
    mount(&config, &mut table, &registry, &DescriptorLoader::new(), &catalog())
        .await
        .unwrap();

    assert_eq!(
        registry.list(),
        json!({ "GET": ["/api/users/:id", "/single"] })
    );
}
