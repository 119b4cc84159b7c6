use std::path::{Path, PathBuf};

use iweb_engine::{load_entry, migrate_entry, EntryOutcome, LoadedEntry, MigrateError, SiteApi};
use iweb_logging::{iweb_error, iweb_info, iweb_warn};

/// What happens to each entry once it has been extracted.
pub enum Mode {
    /// Print the extracted fields; nothing is sent.
    DryRun,
    Publish(Box<dyn SiteApi>),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub migrated: usize,
    pub failed: usize,
    pub skipped: usize,
}

pub struct Runner {
    mode: Mode,
    stop_on_error: bool,
}

impl Runner {
    pub fn new(mode: Mode, stop_on_error: bool) -> Self {
        Self {
            mode,
            stop_on_error,
        }
    }

    /// Process `paths` one after another.
    pub async fn run(&self, paths: &[PathBuf]) -> Summary {
        let mut summary = Summary::default();

        for (index, path) in paths.iter().enumerate() {
            match self.process(path).await {
                Ok(_) => summary.migrated += 1,
                Err(err) => {
                    iweb_error!("{} failed: {}", path.display(), err);
                    summary.failed += 1;
                    if self.stop_on_error {
                        summary.skipped = paths.len() - index - 1;
                        iweb_warn!("stopping, {} entries not attempted", summary.skipped);
                        break;
                    }
                }
            }
        }

        iweb_info!(
            "{} entries migrated, {} failed, {} skipped",
            summary.migrated,
            summary.failed,
            summary.skipped
        );
        summary
    }

    async fn process(&self, path: &Path) -> Result<EntryOutcome, MigrateError> {
        match &self.mode {
            Mode::DryRun => {
                let loaded = load_entry(path)?;
                print!("{}", describe(&loaded));
                Ok(loaded.outcome(None))
            }
            Mode::Publish(api) => migrate_entry(path, api.as_ref()).await,
        }
    }
}

/// Dry-run report for one entry.
fn describe(loaded: &LoadedEntry) -> String {
    let entry = &loaded.entry;
    let mut out = format!("== {}\n", loaded.path.display());
    out.push_str(&format!("title:    {}\n", entry.title));
    out.push_str(&format!("date:     {} ({})\n", entry.date, entry.date_text));
    out.push_str(&format!(
        "slug:     {}\n",
        loaded.slug.as_deref().unwrap_or("<none>")
    ));
    out.push_str(&format!(
        "featured: {}\n",
        entry.featured_image.as_deref().unwrap_or("<none>")
    ));
    out.push_str(&format!("images:   {}\n", entry.images.len()));
    for image in &entry.images {
        out.push_str(&format!("  {image}\n"));
    }
    out.push_str("body:\n");
    out.push_str(&entry.body);
    out.push('\n');
    out
}
