use super::scanner::scan_headers;
use super::*;
use crate::flags::Flags;

const MAX_HEADER_SIZE: usize = 8 * 1024;
const MAX_NAME: usize = 4 * 1024;
const MAX_VALUE: usize = 4 * 1024;

fn scan(input: &[u8]) -> (Flags, HeaderMap, usize) {
    let mut headers = HeaderMap::new();
    let mut offset = 0;
    let flags = scan_headers(
        input,
        &mut offset,
        MAX_HEADER_SIZE,
        MAX_NAME,
        MAX_VALUE,
        0,
        &mut headers,
    );
    (flags, headers, offset)
}

macro_rules! test {
    ($input:literal => $flag:ident) => {{
        let (flags, headers, _) = scan($input);
        assert_eq!(flags, Flags::$flag, "flags for {:?}", $input);
        headers
    }};
    ($input:literal => $flag:ident, { $($name:literal: $value:literal),* $(,)? }) => {{
        let (flags, headers, _) = scan($input);
        assert_eq!(flags, Flags::$flag, "flags for {:?}", $input);
        $(
            assert_eq!(
                headers.get($name).map(HeaderValue::as_str),
                Some($value),
                "header {:?} in {:?}",
                $name,
                $input,
            );
        )*
        headers
    }};
}

#[test]
fn known_names() {
    test!(b"Host: example.com\r\n\r\n" => OK, { "host": "example.com" });
    test!(b"Content-Length: 42\r\n\r\n" => OK, { "content-length": "42" });
    test!(b"Content-Type: text/html\r\n\r\n" => OK, { "content-type": "text/html" });
    test!(b"Accept-Encoding: gzip\r\n\r\n" => OK, { "accept-encoding": "gzip" });
    test!(b"If-Modified-Since: date\r\n\r\n" => OK, { "if-modified-since": "date" });
    test!(b"If-Unmodified-Since: date\r\n\r\n" => OK, { "if-unmodified-since": "date" });
    test!(b"Proxy-Authorization: basic\r\n\r\n" => OK, { "proxy-authorization": "basic" });
    test!(b"WWW-Authenticate: basic\r\n\r\n" => OK, { "www-authenticate": "basic" });
    test!(b"X-Forwarded-For: 10.0.0.1\r\n\r\n" => OK, { "x-forwarded-for": "10.0.0.1" });
    test!(b"X-Real-IP: 10.0.0.2\r\n\r\n" => OK, { "x-real-ip": "10.0.0.2" });
    test!(b"Sec-Fetch-Mode: cors\r\n\r\n" => OK, { "sec-fetch-mode": "cors" });
    test!(b"TE: trailers\r\n\r\n" => OK, { "te": "trailers" });
    test!(b"DNT: 1\r\n\r\n" => OK, { "dnt": "1" });
}

#[test]
fn names_are_case_insensitive() {
    test!(b"hOsT: x\r\n\r\n" => OK, { "host": "x" });
    test!(b"CONTENT-LENGTH: 3\r\n\r\n" => OK, { "content-length": "3" });
}

#[test]
fn arbitrary_names_are_lowercased() {
    let headers = test!(b"X-Custom-Header: v\r\n\r\n" => OK, { "x-custom-header": "v" });
    assert_eq!(headers.len(), 1);

    // a known-name prefix that diverges falls through to the arbitrary path
    test!(b"Hostile: v\r\n\r\n" => OK, { "hostile": "v" });
    test!(b"Accepting: v\r\n\r\n" => OK, { "accepting": "v" });
}

#[test]
fn multiple_headers() {
    test!(b"Host: x\r\nContent-Length: 3\r\nCookie: a=1\r\n\r\n" => OK, {
        "host": "x",
        "content-length": "3",
        "cookie": "a=1",
    });
}

#[test]
fn value_whitespace() {
    // leading OWS is skipped, trailing OWS trimmed
    test!(b"Host:    spaced   \r\n\r\n" => OK, { "host": "spaced" });
    test!(b"Host:\ttabbed\t\r\n\r\n" => OK, { "host": "tabbed" });
    // empty value is allowed
    test!(b"Host:\r\n\r\n" => OK, { "host": "" });
}

#[test]
fn lone_lf_line_termination() {
    test!(b"Host: x\nCookie: a\n\r\n" => OK, { "host": "x", "cookie": "a" });
    // lone LF may terminate the block as well
    test!(b"Host: x\r\n\n" => OK, { "host": "x" });
}

#[test]
fn invalid_name_bytes() {
    test!(b"Ho st: x\r\n\r\n" => INVALID_HEADER);
    test!(b"Na\x01me: x\r\n\r\n" => INVALID_HEADER);
    // obsolete line folding
    test!(b"X-Test: a\r\n b\r\n\r\n" => INVALID_HEADER);
}

#[test]
fn invalid_value_bytes() {
    test!(b"Host: te\x01st\r\n\r\n" => INVALID_HEADER_VALUE);
    test!(b"Host: te\x7Fst\r\n\r\n" => INVALID_HEADER_VALUE);
    test!(b"Host: caf\xC3\xA9\r\n\r\n" => INVALID_HEADER_VALUE);
    // bare CR terminator
    test!(b"Host: x\rCookie: a\r\n\r\n" => INVALID_HEADER_VALUE);
}

#[test]
fn numeric_values() {
    test!(b"Content-Length: 42  \r\n\r\n" => OK, { "content-length": "42" });
    test!(b"Content-Length: abc\r\n\r\n" => INVALID_HEADER_VALUE);
    test!(b"Content-Length: -10\r\n\r\n" => INVALID_HEADER_VALUE);
    test!(b"Content-Length: 4 2\r\n\r\n" => INVALID_HEADER_VALUE);
    test!(b"Content-Length:\r\n\r\n" => INVALID_HEADER_VALUE);
    test!(b"DNT: x\r\n\r\n" => INVALID_HEADER_VALUE);
}

#[test]
fn singleton_duplicates() {
    test!(b"Host: a\r\nHost: b\r\n\r\n" => DUPLICATE_SINGLE_HEADER);
    test!(b"Content-Length: 1\r\nContent-Length: 2\r\n\r\n" => DUPLICATE_SINGLE_HEADER);
    test!(b"Origin: a\r\norigin: b\r\n\r\n" => DUPLICATE_SINGLE_HEADER);
    // singleton policy holds even without a dedicated recognition branch
    test!(b"Referer: a\r\nReferer: b\r\n\r\n" => DUPLICATE_SINGLE_HEADER);
}

#[test]
fn smuggling_rejected_in_both_orders() {
    test!(b"Content-Length: 1\r\nTransfer-Encoding: chunked\r\n\r\n" => BAD_REQUEST);
    test!(b"Transfer-Encoding: chunked\r\nContent-Length: 1\r\n\r\n" => BAD_REQUEST);
}

#[test]
fn mergeable_repeats() {
    test!(b"Accept: a\r\nAccept: a\r\n\r\n" => OK, { "accept": "a, a" });
    test!(b"Accept-Language: en\r\nAccept-Language: fr\r\n\r\n" => OK, {
        "accept-language": "en, fr",
    });
    test!(b"Vary: a\r\nVary: b\r\nVary: c\r\n\r\n" => OK, { "vary": "a, b, c" });
}

#[test]
fn normal_repeats_overwrite() {
    test!(b"Cookie: a\r\nCookie: b\r\n\r\n" => OK, { "cookie": "b" });
    test!(b"Set-Cookie: a=1\r\nSet-Cookie: b=2\r\n\r\n" => OK, { "set-cookie": "b=2" });
}

#[test]
fn unterminated_input() {
    test!(b"" => UNTERMINATED_HEADERS);
    test!(b"Host" => UNTERMINATED_HEADERS);
    test!(b"Host: x" => UNTERMINATED_HEADERS);
    test!(b"Host: x\r\n" => UNTERMINATED_HEADERS);
    test!(b"Host: x\r\n\r" => UNTERMINATED_HEADERS);
    test!(b"Transfer-Enc" => UNTERMINATED_HEADERS);
}

#[test]
fn size_caps() {
    let mut big_value = b"Host: ".to_vec();
    big_value.extend(std::iter::repeat(b'a').take(MAX_VALUE + 10));
    big_value.extend_from_slice(b"\r\n\r\n");
    let (flags, ..) = scan(&big_value);
    assert_eq!(flags, Flags::MAX_HEADER_VALUE_SIZE);

    let mut big_name = Vec::new();
    big_name.extend(std::iter::repeat(b'x').take(MAX_NAME + 10));
    big_name.extend_from_slice(b": v\r\n\r\n");
    let (flags, ..) = scan(&big_name);
    assert_eq!(flags, Flags::MAX_HEADER_NAME_SIZE);

    let mut many = Vec::new();
    for i in 0..1000 {
        many.extend_from_slice(format!("X-{i}: aaaaaaaa\r\n").as_bytes());
    }
    many.extend_from_slice(b"\r\n");
    let (flags, ..) = scan(&many);
    assert_eq!(flags, Flags::MAX_HEADER_SIZE);
}

#[test]
fn continuation_resumes_at_committed_offset() {
    let full = b"Host: x\r\nCookie: a=1\r\n\r\n";

    // first read stops mid-way through the second header
    let partial = &full[..14];
    let mut headers = HeaderMap::new();
    let mut offset = 0;
    let flags = scan_headers(
        partial,
        &mut offset,
        MAX_HEADER_SIZE,
        MAX_NAME,
        MAX_VALUE,
        0,
        &mut headers,
    );
    assert_eq!(flags, Flags::UNTERMINATED_HEADERS);
    assert_eq!(offset, 9, "offset commits at the last complete header");
    assert_eq!(headers.get("host").unwrap(), "x");

    // the second read sees the whole buffer and resumes
    let header_size = offset;
    let flags = scan_headers(
        full,
        &mut offset,
        MAX_HEADER_SIZE,
        MAX_NAME,
        MAX_VALUE,
        header_size,
        &mut headers,
    );
    assert_eq!(flags, Flags::OK);
    assert_eq!(offset, full.len());
    assert_eq!(headers.get("cookie").unwrap(), "a=1");
}

#[test]
fn empty_block() {
    let (flags, headers, offset) = scan(b"\r\nbody");
    assert_eq!(flags, Flags::OK);
    assert!(headers.is_empty());
    assert_eq!(offset, 2);
}
