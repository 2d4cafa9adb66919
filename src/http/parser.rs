use thiserror::Error;
use url::Url;

use super::{Headers, Method, Request, Version};

/// Reasons a raw buffer could not be turned into a [`Request`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid request line parts: {0}")]
    MalformedRequestLine(usize),

    #[error("invalid request line url: {0}")]
    MalformedTarget(String),

    #[error("invalid header line: {0}")]
    MalformedHeaderLine(String),
}

/// Splits a buffer on CR-LF, keeping track of the bytes not yet consumed.
///
/// Behaves like a plain split: a trailing CR-LF yields a final empty line and
/// an empty buffer yields a single empty line.
struct Lines<'a> {
    rest: Option<&'a [u8]>,
}

impl<'a> Lines<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Lines { rest: Some(buf) }
    }

    /// Bytes after the last line handed out, if that line ended in CR-LF.
    fn remainder(&self) -> &'a [u8] {
        self.rest.unwrap_or(&[])
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest.take()?;
        match rest.windows(2).position(|w| w == b"\r\n") {
            Some(idx) => {
                self.rest = Some(&rest[idx + 2..]);
                Some(&rest[..idx])
            }
            None => Some(rest),
        }
    }
}

/// Parses a single HTTP request out of one read buffer.
///
/// There is no `Content-Length` framing: whatever follows the blank line that
/// ends the header block is the body, even when the client declared more.
pub fn parse(raw: &[u8]) -> Result<Request, ParseError> {
    let mut lines = Lines::new(raw);

    let request_line = String::from_utf8_lossy(lines.next().unwrap_or_default());
    let parts: Vec<&str> = request_line.split(' ').collect();
    let [method, target, version] = parts[..] else {
        return Err(ParseError::MalformedRequestLine(parts.len()));
    };

    let (uri, path) = parse_target(target)?;

    let mut headers = Headers::new();
    let mut body: &[u8] = &[];
    while let Some(line) = lines.next() {
        if line.is_empty() {
            body = lines.remainder();
            break;
        }

        let line = String::from_utf8_lossy(line);
        let Some((name, value)) = line.split_once(':') else {
            return Err(ParseError::MalformedHeaderLine(line.into_owned()));
        };
        headers.set(name, value.trim_start_matches(' '));
    }

    Ok(Request {
        method: Method::from(method),
        uri,
        path,
        version: Version::from(version),
        headers,
        body: body.to_vec(),
    })
}

/// Resolves the request target and extracts the decoded path used for routing.
///
/// Only control bytes, targets the URL parser cannot resolve, and bad `%`
/// escapes are rejected. Other characters outside the URI grammar pass through.
fn parse_target(target: &str) -> Result<(Url, String), ParseError> {
    let malformed = || ParseError::MalformedTarget(target.to_string());

    if target.bytes().any(|b| b.is_ascii_control()) {
        return Err(malformed());
    }
    let uri = Url::parse("http://localhost")
        .and_then(|base| base.join(target))
        .map_err(|_| malformed())?;
    let path = percent_decode(raw_path(target)).ok_or_else(malformed)?;

    Ok((uri, path))
}

/// The path of `target` as sent, without query or fragment.
///
/// For absolute-form targets this is whatever follows the authority, which
/// may be empty.
fn raw_path(target: &str) -> &str {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    let target = &target[..end];
    match target.split_once("://") {
        Some((scheme, rest)) if !scheme.contains('/') => {
            rest.find('/').map_or("", |idx| &rest[idx..])
        }
        _ => target,
    }
}

/// Decodes `%XX` escapes. Returns `None` on a malformed escape or when the
/// decoded bytes are not UTF-8.
fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = hex_value(*bytes.get(i + 1)?)?;
            let lo = hex_value(*bytes.get(i + 2)?)?;
            out.push(hi << 4 | lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
