use std::io::{self, Write};

use flate2::Compression;
use flate2::write::GzEncoder;

use super::{ACCEPT_ENCODING, Headers};

pub const GZIP: &str = "gzip";

/// Whether the client lists `gzip` in `Accept-Encoding`.
///
/// Tokens are separated by `", "` and compared exactly. Quality values and
/// wildcards are not understood.
pub fn accepts_gzip(headers: &Headers) -> bool {
    let encoding = headers.get(ACCEPT_ENCODING);
    if encoding.is_empty() {
        return false;
    }
    encoding.split(", ").any(|token| token == GZIP)
}

pub fn gzip(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
