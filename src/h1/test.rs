use bytes::BytesMut;

use crate::h1::parser::{ParseResult, parse_header_chunk, parse_reqline_chunk};
use crate::h1::{DecodeError, DecodeOutcome, Limits, RequestDecoder};
use crate::http::{Method, Version};
use crate::request::Request;

macro_rules! complete {
    ($e:expr) => {
        match $e {
            DecodeOutcome::Complete(req) => req,
            DecodeOutcome::Incomplete => panic!("unexpected `Incomplete`"),
            DecodeOutcome::Malformed(err) => panic!("unexpected `Malformed`: {err:?}"),
        }
    };
}

macro_rules! malformed {
    ($e:expr) => {
        match $e {
            DecodeOutcome::Malformed(err) => err,
            DecodeOutcome::Incomplete => panic!("unexpected `Incomplete`"),
            DecodeOutcome::Complete(req) => panic!("unexpected `Complete`: {req:?}"),
        }
    };
}

fn decode(input: &[u8]) -> DecodeOutcome {
    RequestDecoder::new(Limits::default()).feed(input)
}

// ===== Parser =====

#[test]
fn test_parse_reqline() {
    macro_rules! test {
        (#[pending] $input:literal) => {
            let mut bytes = BytesMut::from(&$input[..]);
            assert!(parse_reqline_chunk(&mut bytes, &Limits::default()).is_pending());
        };
        (#[error] $input:literal, $err:ident) => {
            let mut bytes = BytesMut::from(&$input[..]);
            match parse_reqline_chunk(&mut bytes, &Limits::default()) {
                ParseResult::Err(DecodeError::$err) => {}
                other => panic!("expected `{}`, found {other:?}", stringify!($err)),
            }
        };
        ($input:literal; $m:ident, $target:literal, $v:ident; $rest:literal) => {
            let mut bytes = BytesMut::from(&$input[..]);
            let ParseResult::Ok(reqline) = parse_reqline_chunk(&mut bytes, &Limits::default()) else {
                panic!("failed to parse {:?}", $input);
            };
            assert_eq!(reqline.method, Method::$m);
            assert_eq!(&reqline.target[..], $target);
            assert_eq!(reqline.version, Version::$v);
            assert_eq!(&bytes[..], $rest, "invalid remaining bytes");
        };
    }

    test!(b"GET / HTTP/1.1\r\n"; GET, b"/", HTTP_11; b"");
    test!(b"GET / HTTP/1.1\n"; GET, b"/", HTTP_11; b"");
    test!(b"\r\nPOST /users HTTP/1.0\r\nHost: a\r\n"; POST, b"/users", HTTP_10; b"Host: a\r\n");
    test!(b"DELETE /a?b=c HTTP/1.1\r\n"; DELETE, b"/a?b=c", HTTP_11; b"");

    test!(#[pending] b"GET / HTTP/1.1");
    test!(#[pending] b"GET / HTTP/1.1\r");
    test!(#[pending] b"");

    test!(#[error] b"FETCH / HTTP/1.1\r\n", UnsupportedMethod);
    test!(#[error] b"GET / HTTP/2.0\r\n", UnsupportedVersion);
    test!(#[error] b"GET / FOO\r\n", InvalidRequestLine);
    test!(#[error] b"GET /\r\n", InvalidRequestLine);
    test!(#[error] b"GET\r\n", InvalidRequestLine);
    test!(#[error] b"G@T / HTTP/1.1\r\n", InvalidRequestLine);
    test!(#[error] b"GET / HTTP/1.1\rX\r\n", InvalidRequestLine);
}

#[test]
fn test_parse_header() {
    let mut bytes = BytesMut::from(&b"Content-Type:  text/html \r\nX-Empty:\r\n\r\nrest"[..]);

    let ParseResult::Ok(Some(header)) = parse_header_chunk(&mut bytes) else { panic!() };
    assert_eq!(header.name.as_str(), "content-type");
    assert_eq!(header.value, "text/html");

    let ParseResult::Ok(Some(header)) = parse_header_chunk(&mut bytes) else { panic!() };
    assert_eq!(header.name.as_str(), "x-empty");
    assert_eq!(header.value, "");

    assert!(matches!(parse_header_chunk(&mut bytes), ParseResult::Ok(None)));
    assert_eq!(&bytes[..], b"rest");

    let mut bytes = BytesMut::from(&b"Content-Type"[..]);
    assert!(parse_header_chunk(&mut bytes).is_pending());

    for invalid in [&b"No-Colon\r\n"[..], b" folded: x\r\n", b"Bad Name: x\r\n", b": empty\r\n"] {
        let mut bytes = BytesMut::from(invalid);
        assert!(
            matches!(parse_header_chunk(&mut bytes), ParseResult::Err(DecodeError::InvalidHeader)),
            "{invalid:?}"
        );
    }
}

// ===== Decoder =====

#[test]
fn test_decode_get() {
    let req = complete!(decode(
        b"GET /users/42?expand=true&expand=all HTTP/1.1\r\nHost: example.com\r\nAccept: */*\r\n\r\n"
    ));

    assert_eq!(req.method(), Method::GET);
    assert_eq!(req.target(), "/users/42?expand=true&expand=all");
    assert_eq!(req.path(), "/users/42");
    assert_eq!(req.query().len(), 2);
    assert_eq!(req.query_param("expand"), Some("true"));
    assert_eq!(req.header("HOST"), Some("example.com"));
    assert_eq!(req.version(), Version::HTTP_11);
    assert!(req.body().is_empty());
    assert!(req.keep_alive());
}

#[test]
fn test_decode_content_length() {
    let mut decoder = RequestDecoder::new(Limits::default());

    assert!(matches!(
        decoder.feed(b"POST /echo HTTP/1.1\r\nContent-Length: 11\r\n\r\nhello"),
        DecodeOutcome::Incomplete
    ));
    assert!(!decoder.is_idle());

    let req = complete!(decoder.feed(b" world"));
    assert_eq!(req.body().as_bytes(), b"hello world");
    assert!(decoder.is_idle());
}

#[test]
fn test_decode_pipelined() {
    let mut decoder = RequestDecoder::new(Limits::default());
    let input = b"GET /a HTTP/1.1\r\n\r\nPOST /b HTTP/1.1\r\nContent-Length: 2\r\n\r\nokGET /c HTTP/1.1\r\n";

    let first = complete!(decoder.feed(input));
    assert_eq!(first.path(), "/a");

    let second = complete!(decoder.decode());
    assert_eq!(second.path(), "/b");
    assert_eq!(second.body().as_bytes(), b"ok");

    assert!(matches!(decoder.decode(), DecodeOutcome::Incomplete));
    let third = complete!(decoder.feed(b"\r\n"));
    assert_eq!(third.path(), "/c");
}

#[test]
fn test_decode_chunked() {
    let req = complete!(decode(
        b"POST /upload HTTP/1.1\r\n\
        Transfer-Encoding: chunked\r\n\
        \r\n\
        5;ext=1\r\nhello\r\n\
        6\r\n world\r\n\
        0\r\n\
        X-Checksum: abc\r\n\
        \r\n"
    ));

    assert_eq!(req.body().as_bytes(), b"hello world");
    assert_eq!(req.header("x-checksum"), Some("abc"));
}

/// Decoding must not depend on how the input is split.
#[test]
fn test_decode_split_invariance() {
    const INPUT: &[u8] = b"PUT /files/a%20b?x=1 HTTP/1.1\r\n\
        Host: localhost\r\n\
        Transfer-Encoding: chunked\r\n\
        \r\n\
        4\r\nwiki\r\n\
        A\r\npedia in\r\n\r\n\
        0\r\n\
        \r\n";

    fn summary(req: &Request) -> (Method, String, Vec<(String, String)>, Vec<(String, String)>, Vec<u8>) {
        (
            req.method(),
            req.path().to_owned(),
            req.query().to_vec(),
            req.headers()
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_str().unwrap().to_owned()))
                .collect(),
            req.body().as_bytes().to_vec(),
        )
    }

    let expected = summary(&complete!(decode(INPUT)));
    assert_eq!(expected.1, "/files/a b");
    assert_eq!(expected.4, b"wikipedia in\r\n");

    for split in 1..INPUT.len() {
        let mut decoder = RequestDecoder::new(Limits::default());
        let (head, tail) = INPUT.split_at(split);
        let req = match decoder.feed(head) {
            DecodeOutcome::Incomplete => complete!(decoder.feed(tail)),
            DecodeOutcome::Complete(req) => req,
            DecodeOutcome::Malformed(err) => panic!("split at {split}: {err:?}"),
        };
        assert_eq!(summary(&req), expected, "split at {split}");
    }

    let mut decoder = RequestDecoder::new(Limits::default());
    let (last, bytes) = INPUT.split_last().unwrap();
    for byte in bytes {
        assert!(matches!(decoder.feed(&[*byte]), DecodeOutcome::Incomplete));
    }
    assert_eq!(summary(&complete!(decoder.feed(&[*last]))), expected);
}

#[test]
fn test_decode_malformed() {
    macro_rules! test {
        ($input:expr, $err:pat) => {
            let err = malformed!(decode($input));
            assert!(matches!(err, $err), "{err:?}");
        };
    }

    test!(b"BREW /pot HTTP/1.1\r\n\r\n", DecodeError::UnsupportedMethod);
    test!(b"GET /pot HTTP/3\r\n\r\n", DecodeError::UnsupportedVersion);
    test!(b"GET pot HTTP/1.1\r\n\r\n", DecodeError::InvalidPath);
    test!(b"GET /bad%zz HTTP/1.1\r\n\r\n", DecodeError::InvalidPath);
    test!(b"GET * HTTP/1.1\r\n\r\n", DecodeError::InvalidPath);
    test!(
        b"POST / HTTP/1.1\r\nContent-Length: 3\r\nTransfer-Encoding: chunked\r\n\r\n",
        DecodeError::ConflictingFraming
    );
    test!(
        b"POST / HTTP/1.1\r\nContent-Length: 3\r\nContent-Length: 3\r\n\r\n",
        DecodeError::DuplicateHeader(_)
    );
    test!(b"POST / HTTP/1.1\r\nContent-Length: -1\r\n\r\n", DecodeError::InvalidContentLength);
    test!(b"POST / HTTP/1.1\r\nContent-Length: 1 2\r\n\r\n", DecodeError::InvalidContentLength);
    test!(b"POST / HTTP/1.1\r\nTransfer-Encoding: gzip\r\n\r\n", DecodeError::UnsupportedEncoding);
    test!(
        b"POST / HTTP/1.1\r\nTransfer-Encoding: gzip, chunked\r\n\r\n",
        DecodeError::UnsupportedEncoding
    );
    test!(b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\nxyz\r\n", DecodeError::InvalidChunk);
    test!(b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n2\r\nabc\r\n", DecodeError::InvalidChunk);
}

#[test]
fn test_decode_limits() {
    let limits = Limits {
        max_request_line: 64,
        max_path: 32,
        max_header_bytes: 64,
        max_headers: 3,
        max_body: 8,
    };
    let decode = |input: &[u8]| RequestDecoder::new(limits.clone()).feed(input);

    let long_path = format!("GET /{} HTTP/1.1\r\n\r\n", "a".repeat(40));
    assert_eq!(malformed!(decode(long_path.as_bytes())), DecodeError::PathTooLong);

    // unterminated line is rejected before the separator arrives
    let long_path = format!("GET /{}", "a".repeat(40));
    assert_eq!(malformed!(decode(long_path.as_bytes())), DecodeError::PathTooLong);

    let long_header = format!("GET / HTTP/1.1\r\nX-Long: {}\r\n\r\n", "v".repeat(80));
    assert_eq!(malformed!(decode(long_header.as_bytes())), DecodeError::HeadersTooLarge);

    let long_header = format!("GET / HTTP/1.1\r\nX-Long: {}", "v".repeat(80));
    assert_eq!(malformed!(decode(long_header.as_bytes())), DecodeError::HeadersTooLarge);

    let many = b"GET / HTTP/1.1\r\nA: 1\r\nB: 2\r\nC: 3\r\nD: 4\r\n\r\n";
    assert_eq!(malformed!(decode(&many[..])), DecodeError::HeadersTooLarge);

    let large = b"POST / HTTP/1.1\r\nContent-Length: 9\r\n\r\n";
    assert_eq!(malformed!(decode(&large[..])), DecodeError::BodyTooLarge);

    let large = b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n5\r\n";
    assert_eq!(malformed!(decode(&large[..])), DecodeError::BodyTooLarge);

    // unterminated trailer line counts against the header limit
    let trailer = format!(
        "POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n0\r\nx-trailer: {}",
        "a".repeat(80),
    );
    assert_eq!(malformed!(decode(trailer.as_bytes())), DecodeError::HeadersTooLarge);

    let mut decoder = RequestDecoder::new(limits.clone());
    let head = b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n0\r\nx-trailer: ";
    assert!(matches!(decoder.feed(&head[..]), DecodeOutcome::Incomplete));
    let mut outcome = DecodeOutcome::Incomplete;
    for _ in 0..16 {
        outcome = decoder.feed(b"aaaaaaaa");
        if !matches!(outcome, DecodeOutcome::Incomplete) {
            break;
        }
    }
    assert_eq!(malformed!(outcome), DecodeError::HeadersTooLarge);
    assert!(decoder.buffered() <= limits.max_header_bytes);

    let fits = b"POST / HTTP/1.1\r\nContent-Length: 8\r\n\r\n12345678";
    assert_eq!(complete!(decode(&fits[..])).body().len(), 8);
}

#[test]
fn test_decode_recovers_after_malformed() {
    let mut decoder = RequestDecoder::new(Limits::default());
    assert!(matches!(decoder.feed(b"BREW / HTTP/1.1\r\n\r\n"), DecodeOutcome::Malformed(_)));
    assert!(decoder.is_idle());
    let req = complete!(decoder.feed(b"GET /ok HTTP/1.1\r\n\r\n"));
    assert_eq!(req.path(), "/ok");
}

#[test]
fn test_decode_http10_keep_alive() {
    let req = complete!(decode(b"GET / HTTP/1.0\r\n\r\n"));
    assert!(!req.keep_alive());

    let req = complete!(decode(b"GET / HTTP/1.0\r\nConnection: Keep-Alive\r\n\r\n"));
    assert!(req.keep_alive());

    let req = complete!(decode(b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n"));
    assert!(!req.keep_alive());
}
