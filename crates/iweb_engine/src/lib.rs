//! iWeb engine: page decoding, extraction and publishing IO.
mod client;
mod decode;
mod discover;
mod extract;
mod markup;
mod pipeline;
mod publish;
mod slug;
mod types;

pub use client::{ClientSettings, SiteApi, WordPressClient, DEFAULT_API_BASE};
pub use decode::{decode_page, DecodeError, DecodedPage};
pub use discover::{blog_entries_root, discover_entries, DiscoverError};
pub use extract::{Extractor, IwebExtractor};
pub use markup::MarkupEvents;
pub use pipeline::{load_entry, migrate_entry, LoadedEntry};
pub use publish::{substitute_placeholders, Publisher, MAX_MEDIA_PER_REQUEST};
pub use slug::entry_slug;
pub use types::{
    ApiFailure, EntryOutcome, FailureKind, MediaFile, MigrateError, NewPost, PublishError,
    UploadedMedia,
};
