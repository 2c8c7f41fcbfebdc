use super::{NodeId, ParamVec, Router};
use crate::error::RouteError;
use crate::middleware::{Deny, MountPoint, PluginResult};
use http::Method;
use serde_json::{json, Value};

fn fixture() -> Router<&'static str> {
    let mut router = Router::new();
    router
        .any_of(&[Method::GET, Method::POST, Method::HEAD], "/test", "test", None)
        .unwrap();
    router.add_route(Method::GET, "/test/1/2/3", "deep", None).unwrap();
    router.add_route(Method::GET, "/test/:msg", "msg", None).unwrap();
    router
        .add_route(Method::GET, "/test/:param1/:param2", "two", None)
        .unwrap();
    router
        .add_route(Method::GET, "/test/:param1/1/:param2", "two_split", None)
        .unwrap();
    router.add_route(Method::GET, "/splat/*/test", "splat", None).unwrap();
    router.add_route(Method::GET, "/splat1/*", "splat1", None).unwrap();
    router
        .add_route(Method::GET, "/wildcardparam/*/:param", "wild", None)
        .unwrap();
    router
        .add_route(Method::GET, "/wildcardparam/*/test/:param", "wild_test", None)
        .unwrap();
    router
        .add_route(Method::GET, "/wildcardparam2/*/:param/:param2", "wild2", None)
        .unwrap();
    router.add_route(Method::GET, "/or/ping|pong", "or", None).unwrap();
    router
        .add_route(Method::GET, "/or/ping|pong/:param", "or_param", None)
        .unwrap();
    router
}

#[test]
fn test_exact_route() {
    let router = fixture();
    assert_eq!(router.find("/test", &Method::GET).unwrap().path(), "/test");
    assert_eq!(
        router.find("/test/1/2/3", &Method::GET).unwrap().path(),
        "/test/1/2/3"
    );
    // "/test/1/2" walks static 1 then static 2, which has no route
    assert!(router.find("/test/1/2", &Method::GET).is_none());
}

#[test]
fn test_params() {
    let router = fixture();
    let m = router.find("/test/Hello", &Method::GET).unwrap();
    assert_eq!(m.param("msg"), Some("Hello"));
    assert_eq!(m.params.len(), 1);

    let m = router.find("/test/Hello/world", &Method::GET).unwrap();
    assert_eq!(m.param("param1"), Some("Hello"));
    assert_eq!(m.param("param2"), Some("world"));

    let m = router.find("/test/Hello/1/world", &Method::GET).unwrap();
    assert_eq!(m.path(), "/test/:param1/1/:param2");
    assert_eq!(m.param("param1"), Some("Hello"));
    assert_eq!(m.param("param2"), Some("world"));
}

#[test]
fn test_substituted_patterns_report_their_pattern() {
    let mut router = Router::new();
    let patterns = ["/a", "/a/:b", "/a/:b/c", "/x/:y/:z/w"];
    for pattern in patterns {
        router.add_route(Method::GET, pattern, pattern, None).unwrap();
    }
    for (pattern, path) in [
        ("/a", "/a"),
        ("/a/:b", "/a/1"),
        ("/a/:b/c", "/a/1/c"),
        ("/x/:y/:z/w", "/x/1/2/w"),
    ] {
        assert_eq!(router.find(path, &Method::GET).unwrap().path(), pattern);
    }
}

#[test]
fn test_query_string_ignored() {
    let router = fixture();
    let m = router.find("/test/Hello?x=1&y=2", &Method::GET).unwrap();
    assert_eq!(m.param("msg"), Some("Hello"));
}

#[test]
fn test_alternation() {
    let router = fixture();
    assert_eq!(router.find("/or/ping", &Method::GET).unwrap().path(), "/or/ping|pong");
    assert_eq!(router.find("/or/pong", &Method::GET).unwrap().path(), "/or/ping|pong");
    assert!(router.find("/or/po", &Method::GET).is_none());

    let m = router.find("/or/pong/Hello world", &Method::GET).unwrap();
    assert_eq!(m.param("param"), Some("Hello world"));
    let m = router.find("/or/ping/Hello world", &Method::GET).unwrap();
    assert_eq!(m.param("param"), Some("Hello world"));
}

#[test]
fn test_alternation_shares_one_node() {
    let router = fixture();
    assert_eq!(router.node_for("/or/ping"), router.node_for("/or/pong"));
    assert!(router.node_for("/or/ping").is_some());
}

#[test]
fn test_alternation_empty_literal_rejected() {
    let mut router: Router<()> = Router::new();
    let err = router.add_route(Method::GET, "/a|/x", (), None).unwrap_err();
    assert!(matches!(err, RouteError::EmptyAlternative { .. }));
}

#[test]
fn test_splat() {
    let router = fixture();
    assert_eq!(
        router.find("/splat/1/2/test", &Method::GET).unwrap().path(),
        "/splat/*/test"
    );
    assert!(router.find("/splat/1/2/3", &Method::GET).is_none());
    assert_eq!(router.find("/splat1/1", &Method::GET).unwrap().path(), "/splat1/*");
    assert_eq!(
        router.find("/splat1/1/2/3", &Method::GET).unwrap().path(),
        "/splat1/*"
    );
    assert!(router.find("/splat1", &Method::GET).is_none());
}

#[test]
fn test_splat_then_param() {
    let router = fixture();
    let m = router.find("/wildcardparam/1/2/hello", &Method::GET).unwrap();
    assert_eq!(m.path(), "/wildcardparam/*/:param");
    assert_eq!(m.param("param"), Some("hello"));
    assert_eq!(m.splat, vec!["1", "2", "hello"]);

    let m = router.find("/wildcardparam/1/2/test/hello", &Method::GET).unwrap();
    assert_eq!(m.path(), "/wildcardparam/*/test/:param");
    assert_eq!(m.param("param"), Some("hello"));
    assert!(m.splat.is_empty());

    let m = router
        .find("/wildcardparam2/1/2/hello/world", &Method::GET)
        .unwrap();
    assert_eq!(m.param("param"), Some("hello"));
    assert_eq!(m.param("param2"), Some("world"));
}

#[test]
fn test_splat_then_param_after_collected_params() {
    let mut router = Router::new();
    router
        .add_route(Method::GET, "/t/:tenant/*/:file", "file", None)
        .unwrap();
    let m = router.find("/t/acme/a/b/c.txt", &Method::GET).unwrap();
    assert_eq!(m.param("tenant"), Some("acme"));
    assert_eq!(m.param("file"), Some("c.txt"));
}

#[test]
fn test_splat_param_then_static() {
    let mut router = Router::new();
    router.add_route(Method::GET, "/x/*/:p/end", "end", None).unwrap();
    let m = router.find("/x/a/b/end", &Method::GET).unwrap();
    assert_eq!(m.path(), "/x/*/:p/end");
    assert_eq!(m.param("p"), Some("b"));
}

#[test]
fn test_splat_param_keeps_position_before_later_params() {
    let mut router = Router::new();
    router.add_route(Method::GET, "/x/*/:p/end/:q", "end_q", None).unwrap();
    let m = router.find("/x/a/b/end/z", &Method::GET).unwrap();
    assert_eq!(m.param("p"), Some("b"));
    assert_eq!(m.param("q"), Some("z"));
    let names: Vec<&str> = m.params.iter().map(|(k, _)| k.as_ref()).collect();
    assert_eq!(names, vec!["p", "q"]);
}

#[test]
fn test_splat_tail_inserted_between_surrounding_params() {
    let mut router = Router::new();
    router
        .add_route(Method::GET, "/t/:id/*/:p/end/:q", "mixed", None)
        .unwrap();
    let m = router.find("/t/7/a/b/end/z", &Method::GET).unwrap();
    assert_eq!(m.param("id"), Some("7"));
    assert_eq!(m.param("p"), Some("b"));
    assert_eq!(m.param("q"), Some("z"));
}

#[test]
fn test_splat_short_path_binds_available_params_only() {
    // The param child's route serves a path that stops at the static
    // continuation; names without a value are left unbound.
    let mut router = Router::new();
    router.add_route(Method::GET, "/x/*/:p/end/:q", "end_q", None).unwrap();
    let m = router.find("/x/a/end", &Method::GET).unwrap();
    assert_eq!(m.path(), "/x/*/:p/end/:q");
    assert_eq!(m.param("p"), Some("a"));
    assert_eq!(m.param("q"), None);
    assert_eq!(m.params.len(), 1);
}

#[test]
fn test_splat_prefers_own_route_over_param_child() {
    let mut router = Router::new();
    router.add_route(Method::GET, "/a/*", "bare", None).unwrap();
    router.add_route(Method::GET, "/a/*/:p", "param", None).unwrap();
    let m = router.find("/a/1/2", &Method::GET).unwrap();
    assert_eq!(*m.handler(), "bare");
    assert!(m.params.is_empty());
}

#[test]
fn test_splat_without_route_for_method() {
    let router = fixture();
    assert!(router.find("/wildcardparam/1/2/hello", &Method::POST).is_none());
}

#[test]
fn test_methods() {
    let router = fixture();
    assert!(router.find("/test", &Method::GET).is_some());
    assert!(router.find("/test", &Method::POST).is_some());
    assert!(router.find("/test", &Method::HEAD).is_some());
    assert!(router.find("/test", &Method::PATCH).is_none());
}

#[test]
fn test_any_of_returns_routes_in_method_order() {
    let mut router = Router::new();
    let routes = router
        .any_of(&[Method::PUT, Method::DELETE], "/items/:id", "items", None)
        .unwrap();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].method(), &Method::PUT);
    assert_eq!(routes[1].method(), &Method::DELETE);
    assert_eq!(router.len(), 2);
}

#[test]
fn test_duplicate_route() {
    let mut router = fixture();
    router.add_route(Method::GET, "/test/duplicate", "a", None).unwrap();
    let err = router
        .add_route(Method::GET, "/test/duplicate", "b", None)
        .unwrap_err();
    assert!(matches!(err, RouteError::DuplicateRoute { .. }));
    assert!(err.to_string().starts_with("Duplicate route"));

    // the first registration survives
    assert_eq!(*router.find("/test/duplicate", &Method::GET).unwrap().handler(), "a");
}

#[test]
fn test_duplicate_route_different_param_names() {
    let mut router = fixture();
    router
        .add_route(Method::GET, "/test/dup2/:param1", "a", None)
        .unwrap();
    let err = router
        .add_route(Method::GET, "/test/dup2/:param2", "b", None)
        .unwrap_err();
    assert!(matches!(err, RouteError::DuplicateRoute { .. }));

    // a different method on the same node is fine
    router
        .add_route(Method::POST, "/test/dup2/:param2", "c", None)
        .unwrap();
    let m = router.find("/test/dup2/v", &Method::POST).unwrap();
    assert_eq!(m.param("param2"), Some("v"));
}

#[test]
fn test_any_of_duplicate_stops_early() {
    let mut router = Router::new();
    router.add_route(Method::POST, "/x", "post", None).unwrap();
    let err = router
        .any_of(&[Method::GET, Method::POST, Method::PUT], "/x", "multi", None)
        .unwrap_err();
    assert!(matches!(err, RouteError::DuplicateRoute { .. }));
    assert!(router.find("/x", &Method::GET).is_some());
    assert!(router.find("/x", &Method::PUT).is_none());
}

#[test]
fn test_root_route() {
    let mut router = Router::new();
    router.add_route(Method::GET, "/", "root", None).unwrap();
    assert_eq!(*router.find("/", &Method::GET).unwrap().handler(), "root");
    assert_eq!(*router.find("", &Method::GET).unwrap().handler(), "root");
    assert_eq!(*router.find("/?q=1", &Method::GET).unwrap().handler(), "root");
    assert!(router.find("/other", &Method::GET).is_none());
}

#[test]
fn test_static_beats_param() {
    let mut router = Router::new();
    router.add_route(Method::GET, "/users/me", "me", None).unwrap();
    router.add_route(Method::GET, "/users/:id", "by_id", None).unwrap();
    assert_eq!(*router.find("/users/me", &Method::GET).unwrap().handler(), "me");
    assert_eq!(*router.find("/users/42", &Method::GET).unwrap().handler(), "by_id");
}

#[test]
fn test_no_backtracking_across_siblings() {
    let mut router = Router::new();
    router.add_route(Method::GET, "/a/b/c", "abc", None).unwrap();
    router.add_route(Method::GET, "/a/:x/d", "axd", None).unwrap();
    // static "b" is taken, and there is no "d" under it
    assert!(router.find("/a/b/d", &Method::GET).is_none());
    assert!(router.find("/a/z/d", &Method::GET).is_some());
}

#[test]
fn test_middleware_short_circuit() {
    let mut router = Router::new();
    router
        .use_middleware("/middleware", |_: &ParamVec, _: Option<&Value>| Some(json!(true)))
        .unwrap();
    router
        .use_middleware("/middleware/false", |_: &ParamVec, _: Option<&Value>| {
            Some(json!(false))
        })
        .unwrap();
    router
        .add_route(Method::GET, "/middleware/test", "ok", None)
        .unwrap();
    router
        .add_route(Method::GET, "/middleware/false/test", "blocked", None)
        .unwrap();

    assert!(router.find("/middleware/test", &Method::GET).is_some());
    assert!(router.find("/middleware/false/test", &Method::GET).is_none());
    assert!(router.find("/middleware/false/1", &Method::GET).is_none());
}

#[test]
fn test_middleware_sees_mount_params() {
    let mut router = Router::new();
    router
        .use_middleware("/t/:tenant", |params: &ParamVec, _: Option<&Value>| {
            let (_, tenant) = params.iter().find(|(k, _)| k.as_ref() == "tenant")?;
            (tenant != "banned").then(|| json!(true))
        })
        .unwrap();
    router.add_route(Method::GET, "/t/:tenant/home", "home", None).unwrap();

    assert!(router.find("/t/acme/home", &Method::GET).is_some());
    assert!(router.find("/t/banned/home", &Method::GET).is_none());
}

#[test]
fn test_mount_plugin_adds_subroutes() {
    let mut router: Router<&'static str> = Router::new();
    router
        .mount(
            "/api/v1",
            |r: &mut Router<&'static str>, at: &MountPoint| -> PluginResult {
                r.add_route_at(at.node, Method::GET, "/status", "status", None)?;
                r.add_route_at(at.node, Method::GET, "/users/:id", "user", None)?;
                Ok(None)
            },
            None,
        )
        .unwrap();

    assert_eq!(*router.find("/api/v1/status", &Method::GET).unwrap().handler(), "status");
    let m = router.find("/api/v1/users/7", &Method::GET).unwrap();
    assert_eq!(m.param("id"), Some("7"));
    // paths are relative to the mount point
    assert_eq!(m.path(), "/users/:id");
    assert!(router.find("/status", &Method::GET).is_none());
}

#[test]
fn test_mount_plugin_gate_and_error() {
    let mut router: Router<&'static str> = Router::new();
    router
        .mount(
            "/private",
            |r: &mut Router<&'static str>, at: &MountPoint| -> PluginResult {
                r.add_route_at(at.node, Method::GET, "/data", "data", None)?;
                Ok(Some(Box::new(Deny)))
            },
            None,
        )
        .unwrap();
    assert!(router.find("/private/data", &Method::GET).is_none());

    let err = router
        .mount(
            "/broken",
            |_: &mut Router<&'static str>, _: &MountPoint| -> PluginResult {
                Err(anyhow::anyhow!("no config"))
            },
            None,
        )
        .unwrap_err();
    assert!(matches!(err, RouteError::Plugin { .. }));
}

#[test]
fn test_add_route_at_unknown_node() {
    let mut router: Router<()> = Router::new();
    let err = router
        .add_route_at(NodeId(99), Method::GET, "/x", (), None)
        .unwrap_err();
    assert!(matches!(err, RouteError::UnknownNode(_)));
}

#[test]
fn test_options_pass_through() {
    let mut router: Router<&str, u32> = Router::default();
    router.add_route(Method::GET, "/opt", "opt", Some(7)).unwrap();
    let m = router.find("/opt", &Method::GET).unwrap();
    assert_eq!(m.route.options(), Some(&7));
    assert!(m.matched);
}

#[test]
fn test_routes_iterates_each_route_once() {
    let router = fixture();
    // "/test" contributes three methods; alternation routes are listed once
    assert_eq!(router.routes().count(), router.len());
    assert_eq!(router.len(), 14);
    assert_eq!(router.routes().filter(|r| r.path() == "/or/ping|pong").count(), 1);
}

#[test]
fn test_node_for_does_not_create() {
    let router = fixture();
    let before = router.node_count();
    assert!(router.node_for("/nope/never").is_none());
    assert!(router.node_for("/test/:anything").is_some());
    assert_eq!(router.node_count(), before);
}

#[test]
fn test_root_gate_only_covers_root_path() {
    let mut router = Router::new();
    router.add_route(Method::GET, "/", "root", None).unwrap();
    router.add_route(Method::GET, "/a", "a", None).unwrap();
    router.use_middleware("/", Deny).unwrap();

    assert!(router.find("/", &Method::GET).is_none());
    assert_eq!(*router.find("/a", &Method::GET).unwrap().handler(), "a");
}

#[test]
fn test_router_debug_summarises_table() {
    let router = fixture();
    let debug = format!("{router:?}");
    assert!(debug.starts_with("Router"), "{debug}");
    assert!(debug.contains("route_count: 14"), "{debug}");
    assert!(debug.contains(&format!("nodes: {}", router.node_count())), "{debug}");
}
