use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;

use super::*;
use crate::auth::{ApiKey, AuthContext, Basic};
use crate::body::{Body, Repr};
use crate::headers::{HeaderMap, HeaderValue, standard};
use crate::http::{Method, MethodSet, StatusCode};
use crate::request::{Parts, Request};
use crate::response::Response;

async fn ok(_: Request, _: Params, _: AuthContext) -> &'static str {
    "ok"
}

fn request(method: Method, path: &str) -> Request {
    request_with(method, path, &[])
}

fn request_with(method: Method, path: &str, headers: &[(&'static str, &'static str)]) -> Request {
    let mut map = HeaderMap::new();
    for &(name, value) in headers {
        map.append(name, HeaderValue::from_static(value));
    }
    let parts = Parts {
        method,
        path: path.to_owned(),
        headers: map,
        ..Default::default()
    };
    Request::from_parts(parts, Body::empty())
}

fn body(res: Response) -> Bytes {
    match res.into_body().into_repr() {
        Repr::Empty => Bytes::new(),
        Repr::Full(bytes) => bytes,
        Repr::Stream(_) => panic!("unexpected stream body"),
    }
}

/// Returns the matched pattern and params.
fn matched(router: &Router, method: Method, path: &str) -> Option<(String, Vec<(String, String)>)> {
    match router.resolve(method, path) {
        Resolution::Match(m) => {
            let params = m
                .params()
                .iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
            Some((m.pattern().to_owned(), params))
        }
        _ => None,
    }
}

#[test]
fn precedence() {
    let mut router = Router::new();
    router
        .get("/users/me", ok).unwrap()
        .get("/users/{id}", ok).unwrap()
        .get("/users/*", ok).unwrap()
        .get("/", ok).unwrap();

    macro_rules! test {
        ($path:literal, $pattern:literal, [$(($k:literal, $v:literal)),*]) => {
            let (pattern, params) = matched(&router, Method::GET, $path).expect($path);
            assert_eq!(pattern, $pattern);
            let expected: Vec<(String, String)> = vec![$(($k.to_owned(), $v.to_owned())),*];
            assert_eq!(params, expected);
        };
    }

    test!("/users/me", "/users/me", []);
    test!("/users/42", "/users/{id}", [("id", "42")]);
    test!("/users/42/posts/7", "/users/*", [("*", "42/posts/7")]);
    test!("/users", "/users/*", [("*", "")]);
    test!("/", "/", []);
    assert!(matched(&router, Method::GET, "/posts").is_none());
}

#[test]
fn backtracking() {
    let mut router = Router::new();
    router
        .get("/a/b/c", ok).unwrap()
        .get("/a/{x}/d", ok).unwrap()
        .get("/{y}/b/e", ok).unwrap();

    let (pattern, params) = matched(&router, Method::GET, "/a/b/d").unwrap();
    assert_eq!(pattern, "/a/{x}/d");
    assert_eq!(params, [("x".to_owned(), "b".to_owned())]);

    let (pattern, params) = matched(&router, Method::GET, "/a/b/e").unwrap();
    assert_eq!(pattern, "/{y}/b/e");
    assert_eq!(params, [("y".to_owned(), "a".to_owned())]);

    assert!(matched(&router, Method::GET, "/a/b/f").is_none());
}

#[test]
fn method_resolution() {
    let mut router = Router::new();
    router
        .get("/items/{id}", ok).unwrap()
        .delete("/items/{id}", ok).unwrap()
        .post("/items", ok).unwrap();

    assert!(matched(&router, Method::DELETE, "/items/1").is_some());
    // HEAD falls back to GET
    assert!(matched(&router, Method::HEAD, "/items/1").is_some());

    match router.resolve(Method::PUT, "/items/1") {
        Resolution::MethodNotAllowed(allowed) => {
            let expected = MethodSet::from_iter([Method::GET, Method::HEAD, Method::DELETE]);
            assert_eq!(allowed, expected);
        }
        other => panic!("expected 405, found {other:?}"),
    }

    match router.resolve(Method::GET, "/items") {
        Resolution::MethodNotAllowed(allowed) => assert_eq!(allowed, MethodSet::from(Method::POST)),
        other => panic!("expected 405, found {other:?}"),
    }

    assert!(matches!(router.resolve(Method::GET, "/other"), Resolution::NotFound));
    // a node on the path without any binding is not a match
    let mut router = Router::new();
    router.get("/a/b", ok).unwrap();
    assert!(matches!(router.resolve(Method::GET, "/a"), Resolution::NotFound));
}

#[test]
fn registration_errors() {
    let mut router = Router::new();
    router.get("/users/{id}", ok).unwrap();

    assert!(matches!(
        router.get("/users/{id}/", ok),
        Err(RouteError::RouteConflict(_))
    ));
    assert!(matches!(
        router.post("/users/{name}", ok),
        Err(RouteError::AmbiguousParameter(_))
    ));
    assert!(matches!(
        router.get("/files/*/x", ok),
        Err(RouteError::InvalidPattern(_))
    ));

    // same pattern, another method
    router.post("/users/{id}", ok).unwrap();
    router.methods(MethodSet::from_iter([Method::PUT, Method::PATCH]), "/users/{id}", ok).unwrap();
    assert_eq!(router.len(), 4);

    // every method
    router.any("/all", ok).unwrap();
    assert_eq!(router.len(), 4 + Method::COUNT);
    assert!(matches!(
        router.methods(MethodSet::from(Method::GET), "/all", ok),
        Err(RouteError::RouteConflict(_))
    ));
}

#[test]
fn failed_registration_binds_nothing() {
    let mut router = Router::new();
    router.post("/x", ok).unwrap();

    assert!(matches!(router.any("/x", ok), Err(RouteError::RouteConflict(_))));
    assert_eq!(router.len(), 1);
    assert!(matches!(router.resolve(Method::GET, "/x"), Resolution::MethodNotAllowed(_)));

    let api = Controller::new("/api")
        .get("/a", ok)
        .get("/b/{id}", ok)
        .post("/b/{name}", ok);
    assert!(matches!(router.mount(api), Err(RouteError::AmbiguousParameter(_))));
    assert_eq!(router.len(), 1);
    assert!(matches!(router.resolve(Method::GET, "/api/a"), Resolution::NotFound));

    // conflict within the same group
    let api = Controller::new("/api").get("/a", ok).get("/a", ok);
    assert!(matches!(router.mount(api), Err(RouteError::RouteConflict(_))));
    assert_eq!(router.len(), 1);

    let api = Controller::new("/api")
        .get("/a", ok)
        .head("/a", ok)
        .options("/a", ok);
    router.mount(api).unwrap();
    assert_eq!(router.len(), 4);
    match router.resolve(Method::OPTIONS, "/api/a") {
        Resolution::Match(matched) => assert_eq!(matched.pattern(), "/api/a"),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn dispatch() {
    let mut router = Router::new();
    router
        .get("/hello/{name}", |_: Request, params: Params, _: AuthContext| async move {
            format!("hello {}", params.get("name").unwrap_or_default())
        })
        .unwrap();

    let res = router.dispatch(request(Method::GET, "/hello/world")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(res), "hello world");

    let res = router.dispatch(request(Method::GET, "/nope")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = router.dispatch(request(Method::POST, "/hello/world")).await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.headers().get_str(standard::ALLOW), Some("GET, HEAD"));
}

#[tokio::test]
async fn dispatch_auth() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let handler = move |_: Request, _: Params, auth: AuthContext| {
        counter.fetch_add(1, Ordering::SeqCst);
        async move { auth.principal().unwrap_or_default().to_owned() }
    };

    let basic = Basic::new();
    basic.set("user", "pass");

    let mut router = Router::new();
    router
        .mount(Controller::new("/admin").with_auth(basic).get("/me", handler))
        .unwrap();

    let res = router.dispatch(request(Method::GET, "/admin/me")).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key(standard::WWW_AUTHENTICATE));

    let req = request_with(Method::GET, "/admin/me", &[("authorization", "Basic !!!")]);
    let res = router.dispatch(req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let req = request_with(
        Method::GET,
        "/admin/me",
        &[("authorization", "Basic dXNlcjpwYXNz")],
    );
    let res = router.dispatch(req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(res), "user");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn dispatch_api_key_controller() {
    let key = ApiKey::new();
    key.set("k1");

    let mut router = Router::new();
    router
        .mount(
            Controller::new("/api/")
                .with_auth(key)
                .get("/", ok)
                .post("items", ok),
        )
        .unwrap();

    let req = request_with(Method::POST, "/api/items", &[("x-api-key", "k1")]);
    assert_eq!(router.dispatch(req).await.status(), StatusCode::OK);

    let req = request_with(Method::GET, "/api", &[("x-api-key", "k2")]);
    assert_eq!(router.dispatch(req).await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn handler_error() {
    async fn fails(_: Request, _: Params, _: AuthContext) -> Result<String, HandlerError> {
        let n: u32 = "nan".parse()?;
        Ok(n.to_string())
    }

    let mut router = Router::new();
    router.get("/fail", fails).unwrap();

    let res = router.dispatch(request(Method::GET, "/fail")).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body(res), "Internal Server Error");
}

#[tokio::test]
async fn static_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>hi</h1>").unwrap();
    std::fs::create_dir(dir.path().join("css")).unwrap();
    std::fs::write(dir.path().join("css/site.css"), "body{}").unwrap();

    let mut router = Router::new();
    router
        .mount(StaticFiles::new("/static", FsRepository::new(dir.path())))
        .unwrap();

    let res = router.dispatch(request(Method::GET, "/static/index.html")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get_str(standard::CONTENT_TYPE), Some("text/html; charset=utf-8"));
    assert_eq!(body(res), "<h1>hi</h1>");

    let res = router.dispatch(request(Method::HEAD, "/static/css/site.css")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get_str(standard::CONTENT_TYPE), Some("text/css; charset=utf-8"));

    let res = router.dispatch(request(Method::GET, "/static/missing.js")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = router.dispatch(request(Method::GET, "/static")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = router.dispatch(request(Method::POST, "/static/index.html")).await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}
