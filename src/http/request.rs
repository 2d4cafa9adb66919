use url::Url;

use super::{Headers, Method, Version};

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// The request target resolved against `http://localhost`.
    pub uri: Url,
    /// Percent-decoded path of the target as sent. Routing only looks at this.
    pub path: String,
    pub version: Version,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl Request {
    pub fn header(&self, name: &str) -> &str {
        self.headers.get(name)
    }

    /// Path split on `/`, including the empty leading segment.
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').collect()
    }
}
