use std::fmt::Display;

pub mod encoding;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;

pub use headers::Headers;
pub use parser::ParseError;
pub use request::Request;
pub use response::Response;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_ENCODING: &str = "Content-Encoding";
pub const USER_AGENT: &str = "User-Agent";
pub const ACCEPT_ENCODING: &str = "Accept-Encoding";

pub const TEXT_PLAIN: &str = "text/plain";
pub const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Method {
    Get,
    Post,
    /// Any other token. Kept verbatim so it can be logged.
    Other(String),
}

impl From<&str> for Method {
    fn from(s: &str) -> Self {
        match s {
            "GET" => Method::Get,
            "POST" => Method::Post,
            other => Method::Other(other.to_string()),
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Other(token) => write!(f, "{}", token),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Version {
    Http1_0,
    Http1_1,
    Other(String),
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        match s {
            "HTTP/1.0" => Version::Http1_0,
            "HTTP/1.1" => Version::Http1_1,
            other => Version::Other(other.to_string()),
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Version::Http1_0 => write!(f, "HTTP/1.0"),
            Version::Http1_1 => write!(f, "HTTP/1.1"),
            Version::Other(token) => write!(f, "{}", token),
        }
    }
}

/// A response status code.
///
/// Only the associated constants are ever produced by the router, but any
/// code can be represented; codes outside the table render an empty reason
/// phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const CREATED: StatusCode = StatusCode(201);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const BAD_GATEWAY: StatusCode = StatusCode(502);

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            400 => "Bad Request",
            404 => "Not Found",
            502 => "Bad Gateway",
            _ => "",
        }
    }
}

impl Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
