//! Clipboard payload abstraction.
//!
//! The platform clipboard hands the host zero or more MIME-typed
//! representations; the host awaits that read (the one asynchronous point in
//! the system) and packs the result into a `ClipboardPayload`. From there on
//! the pipeline is synchronous and DOM-free.

use thiserror::Error;

/// The MIME flavors the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    SvgXml,
    Html,
    PlainText,
    Png,
    Jpeg,
    Webp,
}

impl Flavor {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/svg+xml" => Some(Flavor::SvgXml),
            "text/html" => Some(Flavor::Html),
            "text/plain" => Some(Flavor::PlainText),
            "image/png" => Some(Flavor::Png),
            "image/jpeg" => Some(Flavor::Jpeg),
            "image/webp" => Some(Flavor::Webp),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Flavor::SvgXml => "image/svg+xml",
            Flavor::Html => "text/html",
            Flavor::PlainText => "text/plain",
            Flavor::Png => "image/png",
            Flavor::Jpeg => "image/jpeg",
            Flavor::Webp => "image/webp",
        }
    }

    pub fn is_raster(self) -> bool {
        matches!(self, Flavor::Png | Flavor::Jpeg | Flavor::Webp)
    }
}

/// One clipboard representation: text for markup flavors, bytes for rasters.
#[derive(Debug, Clone)]
pub enum Representation {
    Text { flavor: Flavor, text: String },
    Bytes { flavor: Flavor, bytes: Vec<u8> },
}

impl Representation {
    pub fn flavor(&self) -> Flavor {
        match self {
            Representation::Text { flavor, .. } | Representation::Bytes { flavor, .. } => *flavor,
        }
    }
}

/// Everything one paste event exposed.
#[derive(Debug, Clone, Default)]
pub struct ClipboardPayload {
    reps: Vec<Representation>,
}

/// Failure reading the platform clipboard — permission denied or the API
/// itself failing. Surfaced to the user as a single blocking notification;
/// never retried.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard permission denied")]
    PermissionDenied,
    #[error("clipboard read failed: {0}")]
    ReadFailed(String),
}

impl ClipboardPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&mut self, mime: &str, text: impl Into<String>) {
        if let Some(flavor) = Flavor::from_mime(mime) {
            self.reps.push(Representation::Text { flavor, text: text.into() });
        } else {
            log::debug!("clipboard: ignoring unknown flavor {mime:?}");
        }
    }

    pub fn push_bytes(&mut self, mime: &str, bytes: Vec<u8>) {
        if let Some(flavor) = Flavor::from_mime(mime) {
            self.reps.push(Representation::Bytes { flavor, bytes });
        } else {
            log::debug!("clipboard: ignoring unknown flavor {mime:?}");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reps.is_empty()
    }

    /// All raster blobs, in payload order.
    pub fn rasters(&self) -> impl Iterator<Item = (Flavor, &[u8])> {
        self.reps.iter().filter_map(|rep| match rep {
            Representation::Bytes { flavor, bytes } if flavor.is_raster() => {
                Some((*flavor, bytes.as_slice()))
            }
            _ => None,
        })
    }

    /// The first text representation of the given flavor.
    pub fn text_of(&self, wanted: Flavor) -> Option<&str> {
        self.reps.iter().find_map(|rep| match rep {
            Representation::Text { flavor, text } if *flavor == wanted => Some(text.as_str()),
            _ => None,
        })
    }
}
