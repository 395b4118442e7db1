//! Registration, matching and reverse routing tests for Router

use super::{body_of, create_linear_router, create_test_router, dispatch};
use crate::{DEFAULT_RESPONSE_TYPE, ErrorKind, Handler, Params, ResponseSink};
use std::fmt;

fn params(pairs: &[(&str, &str)]) -> Params {
    pairs.iter().copied().collect()
}

#[test]
fn test_optional_segment_with_rule() {
    let mut router = create_test_router();
    router
        .on("/element(/:id)/?", |args, _| {
            format!("element:{}", args.get("id").unwrap_or("-"))
        })
        .unwrap()
        .rules([("id", r"\d+")])
        .unwrap();

    assert_eq!(body_of(&router, "/element").as_deref(), Some("element:-"));
    assert_eq!(body_of(&router, "/element/").as_deref(), Some("element:-"));
    assert_eq!(body_of(&router, "/element/123").as_deref(), Some("element:123"));
    assert_eq!(body_of(&router, "/element/foo"), None);
}

#[test]
fn test_extract_args_only_participating_captures() {
    let mut router = create_test_router();
    let id = router
        .on("/element(/:id)/?", |_, _| ())
        .unwrap()
        .rules([("id", r"\d+")])
        .unwrap()
        .id();

    let route = router.find_route(id).unwrap();
    assert!(route.extract_args("/element").is_empty());
    assert_eq!(route.extract_args("/element/123"), params(&[("id", "123")]));
}

#[test]
fn test_static_route_ignores_trailing_slash() {
    let mut router = create_test_router();
    router.on("/about/team", |_, _| "team").unwrap();

    assert_eq!(body_of(&router, "/about/team/").as_deref(), Some("team"));
    assert_eq!(body_of(&router, "/about/team").as_deref(), Some("team"));
    assert_eq!(body_of(&router, "/about"), None);
}

#[test]
fn test_root_route() {
    let mut router = create_test_router();
    router.on("/", |_, _| "home").unwrap();

    assert_eq!(body_of(&router, "/").as_deref(), Some("home"));
    assert_eq!(body_of(&router, "").as_deref(), Some("home"));
}

#[test]
fn test_method_filtering() {
    let mut router = create_test_router();
    router.post("/items", |_, _| "created").unwrap();
    router
        .on("/items/:id", |_, _| "item")
        .unwrap()
        .via(["GET", "put"]);

    assert!(!dispatch(&router, "/items", "get").0);
    assert_eq!(dispatch(&router, "/items", "POST").1.body(), "created");
    assert!(dispatch(&router, "/items/3", "put").0);
    assert!(!dispatch(&router, "/items/3", "delete").0);
}

#[test]
fn test_any_accepts_every_method() {
    let mut router = create_test_router();
    router.any("/ping", |_, _| "pong").unwrap();

    for method in ["get", "post", "patch", "options"] {
        assert_eq!(dispatch(&router, "/ping", method).1.body(), "pong");
    }
}

#[test]
fn test_method_map_routes_by_method() {
    let mut router = create_test_router();
    router
        .map(
            "/profile",
            [
                ("get", Handler::literal("show")),
                ("POST", Handler::func(|_: &Params, _: &mut crate::Echo| "save")),
            ],
        )
        .unwrap();

    assert_eq!(dispatch(&router, "/profile", "get").1.body(), "show");
    assert_eq!(dispatch(&router, "/profile", "post").1.body(), "save");
    assert!(!dispatch(&router, "/profile", "delete").0);
}

#[test]
fn test_literal_and_view_handlers() {
    struct Greeting(&'static str);

    impl fmt::Display for Greeting {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "<h1>{}</h1>", self.0)
        }
    }

    let mut router = create_test_router();
    router.route("get", "/static", Handler::literal("plain")).unwrap();
    router.route("get", "/view", Handler::view(Greeting("hi"))).unwrap();

    let (_, response) = dispatch(&router, "/static", "get");
    assert_eq!(response.body(), "plain");
    assert_eq!(response.mime(), None);

    let (_, response) = dispatch(&router, "/view", "get");
    assert_eq!(response.body(), "<h1>hi</h1>");
    assert_eq!(response.mime(), Some(DEFAULT_RESPONSE_TYPE));
}

#[test]
fn test_callable_sets_default_content_type() {
    let mut router = create_test_router();
    router.on("/", |_, _| "x").unwrap();
    assert_eq!(dispatch(&router, "/", "get").1.mime(), Some(DEFAULT_RESPONSE_TYPE));
}

#[test]
fn test_route_without_handler_produces_empty_body() {
    let mut router = create_test_router();
    router.route("get", "/empty", None::<Handler>).unwrap();
    let (matched, response) = dispatch(&router, "/empty", "get");
    assert!(matched);
    assert_eq!(response.body(), "");
}

#[test]
fn test_with_replaces_handler() {
    let mut router = create_test_router();
    router
        .on("/swap", |_, _| "old")
        .unwrap()
        .with(|_, _| "new");
    assert_eq!(body_of(&router, "/swap").as_deref(), Some("new"));
}

#[test]
fn test_first_registered_route_wins() {
    for mut router in [create_test_router(), create_linear_router()] {
        router.on("/page/:name", |_, _| "first").unwrap();
        router.on("/page/:slug", |_, _| "second").unwrap();
        assert_eq!(body_of(&router, "/page/a").as_deref(), Some("first"));
    }
}

#[test]
fn test_wildcard_pattern() {
    let mut router = create_test_router();
    router.on("/files/*", |_, _| "file").unwrap();

    assert_eq!(body_of(&router, "/files/a/b/c.txt").as_deref(), Some("file"));
    assert_eq!(body_of(&router, "/files"), None);
}

#[test]
fn test_tagged_url_generation() {
    let mut router = create_test_router();
    router.on("/user/:id", |_, _| ()).unwrap().tag("user");

    assert_eq!(router.url("user", &params(&[("id", "123")])), "/user/123");
    assert_eq!(router.url("user", &Params::new()), "/user");
    assert_eq!(router.url("nobody", &params(&[("id", "1")])), "");
    assert_eq!(router.tagged("user").unwrap().url_pattern(), "/user/:id");
}

#[test]
fn test_url_drops_optional_markers() {
    let mut router = create_test_router();
    router
        .on("/blog(/:year(/:month))", |_, _| ())
        .unwrap()
        .tag("archive");

    assert_eq!(router.url("archive", &Params::new()), "/blog");
    assert_eq!(router.url("archive", &params(&[("year", "2024")])), "/blog/2024");
    assert_eq!(
        router.url("archive", &params(&[("year", "2024"), ("month", "05")])),
        "/blog/2024/05"
    );
}

#[test]
fn test_url_keeps_trailing_optional_slash_marker() {
    let mut router = create_test_router();
    router.on("/element(/:id)/?", |_, _| ()).unwrap().tag("element");
    router.on("/item(/:id)", |_, _| ()).unwrap().tag("item");

    let args = params(&[("id", "7")]);
    assert_eq!(router.url("element", &args), "/element/7/?");
    assert_eq!(router.url("item", &args), "/item/7");
}

#[test]
fn test_last_tag_wins() {
    let mut router = create_test_router();
    router.on("/old", |_, _| ()).unwrap().tag("page");
    router.on("/new", |_, _| ()).unwrap().tag("page");
    assert_eq!(router.url("page", &Params::new()), "/new");
}

#[test]
fn test_empty_tag_clears_route_tag_only() {
    let mut router = create_test_router();
    let id = router.on("/a", |_, _| ()).unwrap().tag("a").id();
    router.route_mut(id).unwrap().tag("");

    assert_eq!(router.find_route(id).unwrap().tag(), None);
    assert_eq!(router.url("a", &Params::new()), "/a");
}

#[test]
fn test_reset_clears_routes_and_keeps_events() {
    let mut router = create_test_router();
    router.on_event("404", |_| Some("missing".into()));

    for _ in 0..2 {
        router.reset();
        router.on("/x", |_, _| "x").unwrap().tag("x");
        assert_eq!(router.len(), 1);
        assert_eq!(body_of(&router, "/x").as_deref(), Some("x"));
        assert_eq!(router.url("x", &Params::new()), "/x");
    }

    router.reset();
    assert!(router.is_empty());
    assert!(router.tagged("x").is_none());
    assert_eq!(router.prefixes().count(), 0);
    assert_eq!(dispatch(&router, "/x", "get").1.body(), "missing");
}

#[test]
fn test_invalid_patterns_are_rejected_at_registration() {
    let mut router = create_test_router();
    let err = router.on("/a#b", |_, _| ()).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::InvalidPattern);

    let err = router
        .on("/item/:id", |_, _| ())
        .unwrap()
        .rules([("id", "[")])
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::InvalidPattern);
}

#[test]
fn test_invalid_rule_on_static_route_is_rejected() {
    let mut router = create_test_router();
    let err = router
        .on("/item", |_, _| ())
        .unwrap()
        .rules([("id", "(")])
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::InvalidPattern);
    assert!(router.routes().all(|route| route.rules().is_empty()));
}

#[test]
fn test_optional_root_group_written_with_its_slash() {
    for mut router in [create_test_router(), create_linear_router()] {
        router
            .on("(/:page)", |args, _| format!("page:{}", args.get("page").unwrap_or("-")))
            .unwrap();
        assert_eq!(body_of(&router, "/").as_deref(), Some("page:-"));
        assert_eq!(body_of(&router, "/intro").as_deref(), Some("page:intro"));
        assert_eq!(body_of(&router, "/intro/more"), None);
    }

    let mut router = create_test_router();
    router
        .group("", |r, _| {
            r.on("(/:x)", |args, _| args.get("x").unwrap_or("root").to_string())?;
            Ok(())
        })
        .unwrap();
    assert_eq!(body_of(&router, "/intro").as_deref(), Some("intro"));
    assert_eq!(body_of(&router, "/").as_deref(), Some("root"));
}

#[test]
fn test_route_accessors() {
    let mut router = create_test_router();
    let id = router
        .on("/a/:b", |_, _| ())
        .unwrap()
        .via(["post", "GET"])
        .rules([("b", "[0-9]+")])
        .unwrap()
        .id();

    let route = router.find_route(id).unwrap();
    assert!(route.is_dynamic());
    assert_eq!(route.methods(), vec!["get", "post"]);
    assert_eq!(route.rules().get("b").map(String::as_str), Some("[0-9]+"));
    assert!(router.route_mut(id).is_some());
}
