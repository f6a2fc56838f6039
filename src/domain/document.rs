#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub filename: String,
    pub content_type: ContentType,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Pdf,
}

impl ContentType {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" | "application/x-pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Resolves an upload's type from its declared MIME type, falling back to
    /// the file extension when the browser sends a generic type.
    pub fn from_upload(mime: Option<&str>, filename: &str) -> Option<Self> {
        if let Some(content_type) = mime.and_then(Self::from_mime) {
            return Some(content_type);
        }

        let generic = matches!(mime, None | Some("application/octet-stream"));
        if generic && filename.to_ascii_lowercase().ends_with(".pdf") {
            return Some(Self::Pdf);
        }

        None
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
        }
    }
}

impl Document {
    pub fn new(filename: String, content_type: ContentType, size_bytes: u64) -> Self {
        Self {
            filename,
            content_type,
            size_bytes,
        }
    }
}
