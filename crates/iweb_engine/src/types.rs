use std::fmt;
use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;
use iweb_core::ExtractError;

use crate::decode::DecodeError;

/// One local image ready to be sent in a media upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// What the platform reports back for one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub id: u64,
    pub url: String,
}

/// Fields of the post-creation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub date: NaiveDate,
    pub content: String,
    pub slug: Option<String>,
    pub featured_image: Option<u64>,
}

/// Result of migrating one entry file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryOutcome {
    pub path: PathBuf,
    pub title: String,
    pub slug: Option<String>,
    pub image_count: usize,
    /// `None` for a dry run.
    pub post_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiFailure {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiFailure {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    InvalidResponse,
    MissingMedia { expected: usize, actual: usize },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::InvalidResponse => write!(f, "invalid response body"),
            FailureKind::MissingMedia { expected, actual } => {
                write!(f, "expected {expected} uploaded media, got {actual}")
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("failed to read image {path:?}: {source}")]
    ImageRead { path: PathBuf, source: io::Error },
    #[error("media upload failed: {0}")]
    Upload(ApiFailure),
    #[error("post creation failed: {0}")]
    Post(ApiFailure),
}

/// Everything that can abort one entry.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    #[error("failed to read entry {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("malformed entry: {0}")]
    Malformed(#[from] ExtractError),
    #[error(transparent)]
    Publish(#[from] PublishError),
}
