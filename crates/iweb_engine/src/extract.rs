use iweb_core::{update, ExtractError, ExtractState, ParsedEntry};

use crate::markup::MarkupEvents;

pub trait Extractor: Send + Sync {
    fn extract(&self, html: &str) -> Result<ParsedEntry, ExtractError>;
}

/// Extractor for pages exported by iWeb: folds the page's markup events
/// through the core state machine in one pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct IwebExtractor;

impl Extractor for IwebExtractor {
    fn extract(&self, html: &str) -> Result<ParsedEntry, ExtractError> {
        let state = MarkupEvents::new(html).try_fold(ExtractState::new(), |state, event| {
            update(state, event?)
        })?;
        state.finish()
    }
}
