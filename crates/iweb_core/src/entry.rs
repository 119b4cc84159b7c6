use chrono::NaiveDate;

use crate::{ExtractError, ExtractState};

/// Long-date format the authoring tool writes, e.g. "Monday, July 4, 2011".
const DATE_FORMAT: &str = "%A, %B %d, %Y";

/// One blog entry recovered from its exported page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    pub title: String,
    /// Date text exactly as found in the page.
    pub date_text: String,
    pub date: NaiveDate,
    /// Markup fragment of the content region, local image directories
    /// replaced by [`crate::IMAGE_PLACEHOLDER`].
    pub body: String,
    /// Percent-decoded local image paths in encounter order, duplicates kept.
    pub images: Vec<String>,
    pub featured_image: Option<String>,
}

impl ParsedEntry {
    /// Parse the page's long-date text into a calendar date.
    pub fn parse_date(text: &str) -> Result<NaiveDate, ExtractError> {
        NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|_| {
            ExtractError::InvalidDate {
                text: text.to_string(),
            }
        })
    }
}

impl ExtractState {
    /// Validate the accumulated fields and produce the entry.
    pub fn finish(self) -> Result<ParsedEntry, ExtractError> {
        let title = self
            .title
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty())
            .ok_or(ExtractError::MissingTitle)?;
        let date_text = self
            .date
            .filter(|date| !date.trim().is_empty())
            .ok_or(ExtractError::MissingDate)?;
        let date = ParsedEntry::parse_date(&date_text)?;

        Ok(ParsedEntry {
            title,
            date_text,
            date,
            body: self.output,
            images: self.images,
            featured_image: self.featured_image,
        })
    }
}
