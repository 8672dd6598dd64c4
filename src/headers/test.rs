use crate::headers::{HeaderMap, HeaderName, HeaderValue, standard};

const fn is_send_sync<T: Send + Sync>() { }
const _: () = {
    is_send_sync::<HeaderMap>();
    is_send_sync::<HeaderName>();
    is_send_sync::<HeaderValue>();
};

#[test]
fn header_map() {
    let mut map = HeaderMap::new();

    map.insert("Content-Type", HeaderValue::from_static("text/plain"));
    assert!(map.contains_key("content-type"));
    assert!(map.contains_key("CONTENT-TYPE"));
    assert!(map.contains_key(standard::CONTENT_TYPE));

    assert!(map.insert("accept", HeaderValue::from_static("*/*")).is_none());
    assert!(map.insert("host", HeaderValue::from_static("example.com")).is_none());

    // Insert Multi

    map.append("set-cookie", HeaderValue::from_static("a=1"));
    map.append("Set-Cookie", HeaderValue::from_static("b=2"));

    let mut all = map.get_all("set-cookie");
    assert!(matches!(all.next(), Some(v) if v == "a=1"));
    assert!(matches!(all.next(), Some(v) if v == "b=2"));
    assert!(all.next().is_none());
    drop(all);

    // Insertion order

    let names = map.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["content-type", "accept", "host", "set-cookie", "set-cookie"]);

    // Replace

    let old = map.insert("set-cookie", HeaderValue::from_static("c=3"));
    assert!(matches!(old, Some(v) if v == "a=1"));
    assert_eq!(map.get_all("set-cookie").count(), 1);

    // Remove

    assert!(map.remove("accept").is_some());
    assert!(!map.contains_key("accept"));
    assert!(map.remove("accept").is_none());
    assert_eq!(map.len(), 3);
}

#[test]
fn header_tokens() {
    let mut map = HeaderMap::new();
    map.append("connection", HeaderValue::from_static("Upgrade, Keep-Alive"));

    assert!(map.has_token("Connection", "keep-alive"));
    assert!(map.has_token("Connection", "upgrade"));
    assert!(!map.has_token("Connection", "close"));
}

#[test]
fn header_name_validation() {
    assert!(HeaderName::from_slice("X-Request-Id").is_ok());
    assert_eq!(HeaderName::from_slice("X-Request-Id").unwrap().as_str(), "x-request-id");
    assert!(HeaderName::from_slice("").is_err());
    assert!(HeaderName::from_slice("bad name").is_err());
    assert!(HeaderName::from_slice("bad:name").is_err());
}

#[test]
fn header_value_validation() {
    assert!(HeaderValue::from_slice("a value\twith tab").is_ok());
    assert!(HeaderValue::from_slice(" leading").is_err());
    assert!(HeaderValue::from_slice("trailing ").is_err());
    assert!(HeaderValue::from_slice("split\r\nheader").is_err());
    assert!(HeaderValue::from_slice("nul\0").is_err());
    assert_eq!(HeaderValue::from_u64(1024), "1024");
}
