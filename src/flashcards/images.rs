//! Inline image transcoding for deck documents
//!
//! Deck documents carry card images either as a reference (`http(s)://` URL
//! or `file:` URI) or as an embedded base64 blob. On load, blobs are written
//! out to image files so cards always point at something dereferenceable; on
//! save, references are fetched and embedded again.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::blocking::Client;
use reqwest::Url;
use thiserror::Error;

/// Values starting with these are references, never blobs
const HTTP_PREFIX: &str = "http";
const FILE_URI_PREFIX: &str = "file:/";

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image request failed with status {0}")]
    Status(reqwest::StatusCode),

    #[error("Invalid file URI: {0}")]
    InvalidFileUri(String),

    #[error("Unsupported image reference: {0}")]
    UnsupportedReference(String),

    #[error("Image payload is empty")]
    Empty,
}

pub type Result<T> = std::result::Result<T, ImageError>;

/// Check whether a document image value is an embedded blob rather than a
/// reference to an external location. `threshold` counts characters.
pub fn is_embedded_blob(value: &str, threshold: usize) -> bool {
    value.chars().count() > threshold
        && !value.starts_with(HTTP_PREFIX)
        && !value.starts_with(FILE_URI_PREFIX)
}

/// Decode an embedded blob into raw image bytes.
///
/// Accepts bare base64 as well as `data:<mime>;base64,<payload>` URLs.
/// Whitespace inside the payload (line-wrapped base64) is ignored.
pub fn decode_blob(blob: &str) -> Result<Vec<u8>> {
    let payload = strip_data_url(blob.trim());
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64.decode(compact.as_bytes())?;
    if bytes.is_empty() {
        return Err(ImageError::Empty);
    }
    Ok(bytes)
}

/// Encode raw image bytes as an embedded blob
pub fn encode_blob(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

fn strip_data_url(value: &str) -> &str {
    if value.starts_with("data:") {
        if let Some(idx) = value.find(";base64,") {
            return &value[idx + ";base64,".len()..];
        }
    }
    value
}

/// Guess a file extension from the payload's magic bytes
pub fn sniff_extension(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "png",
        [0xFF, 0xD8, 0xFF, ..] => "jpg",
        [b'G', b'I', b'F', b'8', ..] => "gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "webp",
        [b'B', b'M', ..] => "bmp",
        _ => "png",
    }
}

/// Write image bytes to a new file in `dir` and return its `file:` URI.
///
/// The file is kept on disk after this returns; it lives as long as the
/// card that references it might need it.
pub fn write_image_file(bytes: &[u8], dir: &Path) -> Result<String> {
    let suffix = format!(".{}", sniff_extension(bytes));
    let mut file = tempfile::Builder::new()
        .prefix("flashdeck-image-")
        .suffix(&suffix)
        .tempfile_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;

    let (_, path) = file.keep().map_err(|e| e.error)?;
    log::debug!("Wrote embedded image to {:?}", path);
    path_to_file_uri(&path)
}

/// Convert a filesystem path into a `file:` URI
pub fn path_to_file_uri(path: &Path) -> Result<String> {
    let absolute = fs::canonicalize(path)?;
    Url::from_file_path(&absolute)
        .map(|url| url.to_string())
        .map_err(|_| ImageError::InvalidFileUri(absolute.display().to_string()))
}

/// Loads the bytes behind an image reference.
///
/// The HTTP client is created on the first remote fetch and reused after
/// that. Every request is bounded by the configured timeout.
pub struct ImageFetcher {
    timeout: Duration,
    client: Option<Client>,
}

impl ImageFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: None,
        }
    }

    /// Load the image behind `reference`.
    ///
    /// Supports `http(s)://` URLs, `file:` URIs and plain paths to existing
    /// files. Anything else is an `UnsupportedReference`.
    pub fn load(&mut self, reference: &str) -> Result<Vec<u8>> {
        let bytes = if reference.starts_with("http://") || reference.starts_with("https://") {
            self.fetch_remote(reference)?
        } else if reference.starts_with("file:") {
            let path = Url::parse(reference)
                .ok()
                .and_then(|url| url.to_file_path().ok())
                .ok_or_else(|| ImageError::InvalidFileUri(reference.to_string()))?;
            fs::read(path)?
        } else if Path::new(reference).is_file() {
            fs::read(reference)?
        } else {
            return Err(ImageError::UnsupportedReference(reference.to_string()));
        };

        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        Ok(bytes)
    }

    fn fetch_remote(&mut self, url: &str) -> Result<Vec<u8>> {
        let client = match self.client.take() {
            Some(client) => client,
            None => Client::builder().timeout(self.timeout).build()?,
        };
        let result = Self::get_bytes(&client, url);
        self.client = Some(client);
        result
    }

    fn get_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
        let response = client.get(url).send()?;
        if !response.status().is_success() {
            log::warn!("Image request for {} returned {}", url, response.status());
            return Err(ImageError::Status(response.status()));
        }
        Ok(response.bytes()?.to_vec())
    }
}
