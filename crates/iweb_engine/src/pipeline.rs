use std::fs;
use std::path::{Path, PathBuf};

use iweb_core::ParsedEntry;
use iweb_logging::{iweb_debug, iweb_info};

use crate::client::SiteApi;
use crate::decode::decode_page;
use crate::extract::{Extractor, IwebExtractor};
use crate::publish::Publisher;
use crate::slug::entry_slug;
use crate::{EntryOutcome, MigrateError};

/// An entry file read and extracted, not yet published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedEntry {
    pub path: PathBuf,
    pub slug: Option<String>,
    pub entry: ParsedEntry,
}

impl LoadedEntry {
    /// Directory the entry's relative image paths resolve against.
    pub fn image_root(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn outcome(&self, post_id: Option<u64>) -> EntryOutcome {
        EntryOutcome {
            path: self.path.clone(),
            title: self.entry.title.clone(),
            slug: self.slug.clone(),
            image_count: self.entry.images.len(),
            post_id,
        }
    }
}

/// Read, decode and extract one entry file.
pub fn load_entry(path: &Path) -> Result<LoadedEntry, MigrateError> {
    let bytes = fs::read(path).map_err(|source| MigrateError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let page = decode_page(&bytes)?;
    let entry = IwebExtractor.extract(&page.html)?;
    let slug = entry_slug(path);

    iweb_debug!("images={:?}", entry.images);
    iweb_debug!("title={}", entry.title);
    iweb_debug!("date={}", entry.date);
    iweb_debug!("slug={}", slug.as_deref().unwrap_or("<none>"));

    Ok(LoadedEntry {
        path: path.to_path_buf(),
        slug,
        entry,
    })
}

/// Extract one entry file and publish it through `api`.
pub async fn migrate_entry(path: &Path, api: &dyn SiteApi) -> Result<EntryOutcome, MigrateError> {
    iweb_info!("{} started", path.display());
    let loaded = load_entry(path)?;
    let outcome = loaded.outcome(None);

    let image_root = loaded.image_root().to_path_buf();
    let post_id = Publisher::new(api)
        .publish(loaded.entry, &image_root, loaded.slug)
        .await?;

    iweb_info!("{} posted, post ID is {}", path.display(), post_id);
    Ok(EntryOutcome {
        post_id: Some(post_id),
        ..outcome
    })
}
