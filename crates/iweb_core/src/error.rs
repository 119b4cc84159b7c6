use thiserror::Error;

/// Structural failure while extracting an entry. Every variant is fatal for
/// the entry being processed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("entry has no title")]
    MissingTitle,
    #[error("entry has no date")]
    MissingDate,
    #[error("date {text:?} does not match \"Weekday, Month Day, Year\"")]
    InvalidDate { text: String },
    #[error("second featured image {second:?} found after {first:?}")]
    DuplicateFeaturedImage { first: String, second: String },
    #[error("unreadable markup at byte {position}: {message}")]
    Markup { position: usize, message: String },
}
