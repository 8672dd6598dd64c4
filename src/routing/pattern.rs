use crate::routing::RouteError;

/// Single segment of a route pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Literal(&'a str),
    Param(&'a str),
    Wildcard,
}

/// Parse route pattern into segments.
///
/// Empty segments are ignored, so `/`, `//` and `` are all the root.
pub(crate) fn parse(pattern: &str) -> Result<Vec<Segment<'_>>, RouteError> {
    let invalid = || RouteError::InvalidPattern(pattern.to_owned());

    if !pattern.is_empty() && !pattern.starts_with('/') {
        return Err(invalid());
    }

    let mut segments = Vec::new();
    let mut parts = pattern.split('/').filter(|s| !s.is_empty()).peekable();

    while let Some(part) = parts.next() {
        let segment = match part {
            "*" if parts.peek().is_none() => Segment::Wildcard,
            "*" | "." | ".." => return Err(invalid()),
            _ => match part.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) if is_param_name(name) => Segment::Param(name),
                Some(_) => return Err(invalid()),
                None if part.contains(['{', '}', '*']) => return Err(invalid()),
                None => Segment::Literal(part),
            },
        };

        if let Segment::Param(name) = segment {
            if segments.contains(&Segment::Param(name)) {
                return Err(invalid());
            }
        }

        segments.push(segment);
    }

    Ok(segments)
}

fn is_param_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Split normalized request path into segments.
pub(crate) fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() {
        use Segment::*;

        macro_rules! test {
            ($pat:literal, [$($seg:expr),*]) => {
                let expected: &[Segment] = &[$($seg),*];
                assert_eq!(parse($pat).unwrap(), expected);
            };
            ($pat:literal, err) => {
                assert!(matches!(parse($pat), Err(RouteError::InvalidPattern(_))), "{}", $pat);
            };
        }

        test!("/", []);
        test!("", []);
        test!("/users", [Literal("users")]);
        test!("/users/", [Literal("users")]);
        test!("/users/{id}/posts", [Literal("users"), Param("id"), Literal("posts")]);
        test!("/static/*", [Literal("static"), Wildcard]);
        test!("/*", [Wildcard]);

        test!("users", err);
        test!("/*/a", err);
        test!("/{}", err);
        test!("/{a-b}", err);
        test!("/{id", err);
        test!("/a{id}", err);
        test!("/x*", err);
        test!("/{id}/{id}", err);
        test!("/a/../b", err);
    }

    #[test]
    fn test_split_path() {
        assert!(split_path("/").is_empty());
        assert_eq!(split_path("/a/b"), ["a", "b"]);
    }
}
