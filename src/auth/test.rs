use std::time::Duration;

use super::*;
use crate::body::Body;
use crate::headers::{HeaderMap, HeaderValue, standard};
use crate::request::{Parts, Request};

fn request(headers: &[(&'static str, &'static str)], query: &[(&str, &str)]) -> Request {
    let mut map = HeaderMap::new();
    for &(name, value) in headers {
        map.append(name, HeaderValue::from_static(value));
    }
    let parts = Parts {
        headers: map,
        query: query
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect(),
        ..Default::default()
    };
    Request::from_parts(parts, Body::empty())
}

#[test]
fn no_auth() {
    let auth = Authorizer::none();
    let req = request(&[("authorization", "Basic dXNlcjpwYXNz")], &[]);
    assert_eq!(auth.authorize(&req), Ok(AuthContext::NoAuth));
    assert_eq!(auth.kind(), AuthKind::NoAuth);
    assert_eq!(AuthContext::NoAuth.principal(), None);
}

#[test]
fn basic_decode() {
    let basic = Basic::new();
    basic.set("user", "pass");

    let req = request(&[("authorization", "Basic dXNlcjpwYXNz")], &[]);
    let ctx = Authorizer::new(basic).authorize(&req).unwrap();
    assert_eq!(ctx.principal(), Some("user"));
    assert_eq!(
        ctx,
        AuthContext::Basic {
            user: "user".into(),
            password: "pass".into()
        }
    );
}

#[test]
fn basic_rejection() {
    let basic = Basic::new();
    basic.set("user", "pass");
    let auth = Authorizer::new(basic);

    macro_rules! test {
        ($headers:expr, $rejection:expr) => {
            let req = request(&$headers[..], &[]);
            assert_eq!(auth.authorize(&req), Err($rejection));
        };
    }

    test!([], Rejection::MissingCredential);
    test!([("authorization", "Basic !!not-base64!!")], Rejection::MalformedCredential);
    test!([("authorization", "Basic")], Rejection::MalformedCredential);
    // base64 of "userpass", no colon
    test!([("authorization", "Basic dXNlcnBhc3M=")], Rejection::MalformedCredential);
    test!([("authorization", "Bearer dXNlcjpwYXNz")], Rejection::MalformedCredential);
    // base64 of "user:nope"
    test!([("authorization", "Basic dXNlcjpub3Bl")], Rejection::InvalidCredential);
    // base64 of "other:pass"
    test!([("authorization", "Basic b3RoZXI6cGFzcw==")], Rejection::InvalidCredential);
}

#[test]
fn basic_challenge() {
    let auth = Authorizer::new(Basic::new().with_realm("admin"));
    let res = auth.reject(Rejection::MissingCredential);
    assert_eq!(res.status(), crate::http::StatusCode::UNAUTHORIZED);
    assert_eq!(
        res.headers().get_str(standard::WWW_AUTHENTICATE),
        Some("Basic realm=\"admin\"")
    );

    let res = auth.reject(Rejection::Forbidden);
    assert_eq!(res.status(), crate::http::StatusCode::FORBIDDEN);
    assert!(!res.headers().contains_key(standard::WWW_AUTHENTICATE));
}

#[test]
fn basic_checker() {
    let basic = Basic::new().with_checker(|user, password| user == password);
    let auth = Authorizer::new(basic);

    // base64 of "same:same"
    let req = request(&[("authorization", "Basic c2FtZTpzYW1l")], &[]);
    assert!(auth.authorize(&req).is_ok());

    let req = request(&[("authorization", "Basic dXNlcjpwYXNz")], &[]);
    assert_eq!(auth.authorize(&req), Err(Rejection::InvalidCredential));
}

#[test]
fn basic_expired() {
    let basic = Basic::new().with_timeout(Duration::ZERO);
    basic.set("user", "pass");
    let req = request(&[("authorization", "Basic dXNlcjpwYXNz")], &[]);
    assert_eq!(Authorizer::new(basic).authorize(&req), Err(Rejection::Expired));
}

#[test]
fn api_key_header() {
    let key = ApiKey::new();
    key.set("secret");
    let auth = Authorizer::new(key);

    let req = request(&[("X-Api-Key", "secret")], &[]);
    assert_eq!(
        auth.authorize(&req),
        Ok(AuthContext::ApiKey { key: "secret".into() })
    );

    let req = request(&[("x-api-key", "wrong")], &[]);
    assert_eq!(auth.authorize(&req), Err(Rejection::InvalidCredential));

    let req = request(&[], &[]);
    assert_eq!(auth.authorize(&req), Err(Rejection::MissingCredential));

    // query is not read unless configured
    let req = request(&[], &[("api_key", "secret")]);
    assert_eq!(auth.authorize(&req), Err(Rejection::MissingCredential));
}

#[test]
fn api_key_query() {
    let key = ApiKey::new().in_query("api_key");
    key.set("secret");
    let auth = Authorizer::new(key);

    let req = request(&[], &[("api_key", "secret")]);
    assert_eq!(auth.authorize(&req).unwrap().principal(), Some("secret"));

    let req = request(&[("x-api-key", "secret")], &[]);
    assert_eq!(auth.authorize(&req), Err(Rejection::MissingCredential));

    let req = request(&[], &[("api_key", "")]);
    assert_eq!(auth.authorize(&req), Err(Rejection::MissingCredential));
}

#[test]
fn api_key_revoke() {
    let key = std::sync::Arc::new(ApiKey::new());
    key.set("a");
    key.set("b");
    let auth = Authorizer::new(key.clone());

    let req = request(&[("x-api-key", "a")], &[]);
    assert!(auth.authorize(&req).is_ok());

    assert!(key.clear("a"));
    assert!(!key.clear("a"));
    assert_eq!(auth.authorize(&req), Err(Rejection::InvalidCredential));

    key.clear_all();
    assert!(key.store().is_empty());
}

#[test]
fn credential_store() {
    let mut store = CredentialStore::new();
    store.set("k", 1);
    assert_eq!(store.check("k", |v| *v == 1), Lookup::Valid);
    assert_eq!(store.check("k", |v| *v == 2), Lookup::Mismatch);
    assert_eq!(store.check("x", |_| true), Lookup::Unknown);

    store.set_timeout(Some(Duration::ZERO));
    assert_eq!(store.check("k", |_| true), Lookup::Expired);
    store.purge_expired();
    assert!(store.is_empty());
}

#[test]
fn secret_eq() {
    assert!(store::secret_eq(b"abc", b"abc"));
    assert!(!store::secret_eq(b"abc", b"abd"));
    assert!(!store::secret_eq(b"abc", b"ab"));
}
