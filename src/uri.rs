//! Request target handling.
//!
//! Request target is kept verbatim for logging, while the path used for route matching is
//! percent-decoded and normalized by [`normalize_path`].
use std::borrow::Cow;

/// An error that can occur when processing request target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UriError {
    /// Target is not origin, absolute, or asterisk form.
    #[error("unsupported request target form")]
    InvalidForm,
    /// Invalid percent encoding, or decoded bytes is not UTF-8.
    #[error("invalid percent encoding")]
    InvalidEncoding,
}

/// Split request target into raw path and raw query, dropping any fragment.
///
/// Absolute form target has its scheme and authority stripped.
pub fn split_target(target: &str) -> Result<(&str, Option<&str>), UriError> {
    let target = match target.split_once('#') {
        Some((target, _)) => target,
        None => target,
    };

    let target = if target.starts_with('/') || target == "*" {
        target
    } else if let Some(rest) = strip_scheme(target) {
        let path = rest.find(['/', '?']).unwrap_or(rest.len());
        &rest[path..]
    } else {
        return Err(UriError::InvalidForm);
    };

    Ok(match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    })
}

fn strip_scheme(target: &str) -> Option<&str> {
    ["http://", "https://"].into_iter().find_map(|scheme| {
        match target.get(..scheme.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(scheme) => Some(&target[scheme.len()..]),
            _ => None,
        }
    })
}

/// Decode `%XX` sequences.
///
/// # Errors
///
/// Returns error if a sequence is truncated, not hexadecimal, or the result is not UTF-8.
pub fn percent_decode(input: &str) -> Result<Cow<'_, str>, UriError> {
    if !input.contains('%') {
        return Ok(Cow::Borrowed(input));
    }

    let mut bytes = input.as_bytes();
    let mut output = Vec::with_capacity(bytes.len());

    while let [byte, rest @ ..] = bytes {
        match byte {
            b'%' => {
                let [hi, lo, rest @ ..] = rest else {
                    return Err(UriError::InvalidEncoding);
                };
                let (Some(hi), Some(lo)) = (hex(*hi), hex(*lo)) else {
                    return Err(UriError::InvalidEncoding);
                };
                output.push(hi << 4 | lo);
                bytes = rest;
            }
            _ => {
                output.push(*byte);
                bytes = rest;
            }
        }
    }

    String::from_utf8(output)
        .map(Cow::Owned)
        .map_err(|_| UriError::InvalidEncoding)
}

const fn hex(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Percent-decode and normalize a raw path.
///
/// Empty and `.` segments are removed, `..` removes the previous segment and never climbs above
/// root. The result always starts with `/` and has no trailing `/`.
///
/// # Errors
///
/// Returns error on invalid percent encoding, or when a decoded segment contains `/` or NUL.
pub fn normalize_path(raw: &str) -> Result<String, UriError> {
    let mut segments = Vec::new();

    for segment in raw.split('/') {
        let segment = percent_decode(segment)?;
        match segment.as_ref() {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if s.contains(['/', '\0']) => return Err(UriError::InvalidEncoding),
            _ => segments.push(segment),
        }
    }

    let mut path = String::with_capacity(raw.len().max(1));
    for segment in &segments {
        path.push('/');
        path.push_str(segment);
    }
    if path.is_empty() {
        path.push('/');
    }
    Ok(path)
}

/// Parse `application/x-www-form-urlencoded` query.
///
/// Pairs keep their order and keys may repeat. A pair with invalid encoding is kept verbatim.
pub fn parse_query(raw: &str) -> Vec<(String, String)> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    match percent_decode(&raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_split_target() {
        assert_eq!(split_target("/a/b?x=1#frag"), Ok(("/a/b", Some("x=1"))));
        assert_eq!(split_target("/"), Ok(("/", None)));
        assert_eq!(split_target("*"), Ok(("*", None)));
        assert_eq!(split_target("http://example.com/x?y"), Ok(("/x", Some("y"))));
        assert_eq!(split_target("HTTP://example.com"), Ok(("", None)));
        assert_eq!(split_target("example.com:443"), Err(UriError::InvalidForm));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/").unwrap(), "/");
        assert_eq!(normalize_path("").unwrap(), "/");
        assert_eq!(normalize_path("/users//42/").unwrap(), "/users/42");
        assert_eq!(normalize_path("/a/./b/../c").unwrap(), "/a/c");
        assert_eq!(normalize_path("/../../etc").unwrap(), "/etc");
        assert_eq!(normalize_path("/hello%20world").unwrap(), "/hello world");
        assert_eq!(normalize_path("/%2e%2e/secret").unwrap(), "/secret");
        assert_eq!(normalize_path("/caf%C3%A9").unwrap(), "/café");
        assert_eq!(normalize_path("/a%2Fb"), Err(UriError::InvalidEncoding));
        assert_eq!(normalize_path("/bad%zz"), Err(UriError::InvalidEncoding));
        assert_eq!(normalize_path("/bad%c3"), Err(UriError::InvalidEncoding));
        assert_eq!(normalize_path("/cut%4"), Err(UriError::InvalidEncoding));
    }

    #[test]
    fn test_parse_query() {
        let query = parse_query("a=1&b=hello+world&a=2&flag&&c=%41");
        assert_eq!(
            query,
            [
                ("a".to_owned(), "1".to_owned()),
                ("b".to_owned(), "hello world".to_owned()),
                ("a".to_owned(), "2".to_owned()),
                ("flag".to_owned(), String::new()),
                ("c".to_owned(), "A".to_owned()),
            ]
        );
    }
}
