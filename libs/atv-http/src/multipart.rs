//! `multipart/form-data` request bodies (RFC 7578).
//!
//! The boundary is generated per form and the matching `Content-Type` header
//! is set by the request builder, so callers never supply one themselves.

use bytes::{BufMut, Bytes, BytesMut};

#[derive(Debug, Clone)]
enum PartBody {
    Text(String),
    File {
        file_name: String,
        content_type: String,
        data: Bytes,
    },
}

#[derive(Debug, Clone)]
struct Part {
    name: String,
    body: PartBody,
}

/// A `multipart/form-data` body under construction.
#[derive(Debug, Clone)]
#[must_use]
pub struct Form {
    boundary: String,
    parts: Vec<Part>,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    /// Create an empty form with a random boundary.
    pub fn new() -> Self {
        let boundary = format!(
            "atv-boundary-{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>()
        );
        Self {
            boundary,
            parts: Vec::new(),
        }
    }

    /// Add a plain text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(Part {
            name: name.into(),
            body: PartBody::Text(value.into()),
        });
        self
    }

    /// Add a file field.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.parts.push(Part {
            name: name.into(),
            body: PartBody::File {
                file_name: file_name.into(),
                content_type: content_type.into(),
                data: data.into(),
            },
        });
        self
    }

    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Value for the request's `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Encode the form into its wire representation.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        for part in &self.parts {
            buf.put_slice(b"--");
            buf.put_slice(self.boundary.as_bytes());
            buf.put_slice(b"\r\n");

            let name = escape_quoted(&part.name);
            match &part.body {
                PartBody::Text(value) => {
                    buf.put_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    buf.put_slice(value.as_bytes());
                }
                PartBody::File {
                    file_name,
                    content_type,
                    data,
                } => {
                    let file_name = escape_quoted(file_name);
                    buf.put_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    buf.put_slice(data);
                }
            }
            buf.put_slice(b"\r\n");
        }
        buf.put_slice(b"--");
        buf.put_slice(self.boundary.as_bytes());
        buf.put_slice(b"--\r\n");
        buf.freeze()
    }
}

/// Quoted-string escaping for `Content-Disposition` parameters.
fn escape_quoted(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
