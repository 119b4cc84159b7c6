//! iWeb core: pure extraction state machine over a stream of markup events.
mod entry;
mod error;
mod event;
mod state;
mod update;

pub use entry::ParsedEntry;
pub use error::ExtractError;
pub use event::{Attribute, MarkupEvent, Tag};
pub use state::ExtractState;
pub use update::{update, IMAGE_PLACEHOLDER};
