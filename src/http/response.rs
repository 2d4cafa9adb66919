use super::{CONTENT_LENGTH, CONTENT_TYPE, Headers, StatusCode, Version};

#[derive(Debug, Clone)]
pub struct Response {
    pub version: Version,
    pub status_code: StatusCode,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl From<StatusCode> for Response {
    fn from(status_code: StatusCode) -> Self {
        Response::new(status_code)
    }
}

impl Response {
    /// Creates an empty `HTTP/1.1` response with no headers.
    pub fn new(status_code: StatusCode) -> Response {
        Response {
            version: Version::Http1_1,
            status_code,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// Replaces the body and keeps `Content-Length` in step with it.
    ///
    /// `Content-Length` is only present while the body is non-empty.
    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
        if self.body.is_empty() {
            self.headers.remove(CONTENT_LENGTH);
        } else {
            self.headers.set(CONTENT_LENGTH, self.body.len().to_string());
        }
    }

    pub fn set_content_type(&mut self, content_type: &str) {
        self.headers.set(CONTENT_TYPE, content_type);
    }

    /// Serializes the response for the wire.
    ///
    /// Headers are written in map order. A non-empty body is followed by an
    /// extra CR-LF.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut response = Vec::with_capacity(128 + self.body.len());

        let status_line = format!(
            "{} {} {}\r\n",
            self.version,
            self.status_code,
            self.status_code.reason_phrase()
        );
        response.extend_from_slice(status_line.as_bytes());

        for (name, value) in self.headers.iter() {
            let header_line = format!("{}: {}\r\n", name, value);
            response.extend_from_slice(header_line.as_bytes());
        }

        response.extend_from_slice(b"\r\n");

        if !self.body.is_empty() {
            response.extend_from_slice(&self.body);
            response.extend_from_slice(b"\r\n");
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_response() {
        let response = Response::new(StatusCode::NOT_FOUND);
        assert_eq!(response.to_bytes(), b"HTTP/1.1 404 Not Found\r\n\r\n");
    }

    #[test]
    fn body_gets_length_and_trailing_crlf() {
        let mut response = Response::new(StatusCode::OK);
        response.set_body(b"abc".to_vec());

        assert_eq!(
            response.to_bytes(),
            b"HTTP/1.1 200 OK\r\ncontent-length: 3\r\n\r\nabc\r\n"
        );
    }

    #[test]
    fn clearing_the_body_drops_content_length() {
        let mut response = Response::new(StatusCode::OK);
        response.set_body(b"abc".to_vec());
        response.set_body(Vec::new());

        assert!(!response.headers.contains("Content-Length"));
        assert_eq!(response.to_bytes(), b"HTTP/1.1 200 OK\r\n\r\n");
    }

    #[test]
    fn every_header_is_emitted_once() {
        let mut response = Response::new(StatusCode::CREATED);
        response.set_content_type("text/plain");
        response.set_content_type("application/octet-stream");
        response.set_body(b"x".to_vec());

        let text = String::from_utf8(response.to_bytes()).unwrap();
        assert!(text.starts_with("HTTP/1.1 201 Created\r\n"));
        assert_eq!(text.matches("content-type: ").count(), 1);
        assert!(text.contains("content-type: application/octet-stream\r\n"));
        assert!(text.contains("content-length: 1\r\n"));
        assert!(text.ends_with("\r\n\r\nx\r\n"));
    }

    #[test]
    fn unknown_status_has_empty_reason() {
        let response = Response::new(StatusCode(299));
        assert_eq!(response.to_bytes(), b"HTTP/1.1 299 \r\n\r\n");
    }
}
