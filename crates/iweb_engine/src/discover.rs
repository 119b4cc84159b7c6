use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use thiserror::Error;

const SITE_INDEX: &str = "index.html";
const REDIRECT_MARKER: &str = "url=";
const ENTRIES_DIR: &str = "Entries";
/// Entries live at `Entries/<year>/<month>/<day>_<name>.html`.
const ENTRY_DEPTH: usize = 3;

#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("failed to read {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("{path:?} has no `url=` redirect to the blog")]
    MissingRedirect { path: PathBuf },
}

/// Locate the `Entries` directory of an exported site from the redirect in
/// its root `index.html`.
pub fn blog_entries_root(site_root: &Path) -> Result<PathBuf, DiscoverError> {
    let index_path = site_root.join(SITE_INDEX);
    let html = fs::read_to_string(&index_path).map_err(|source| DiscoverError::Io {
        path: index_path.clone(),
        source,
    })?;

    let target = redirect_target(&html).ok_or(DiscoverError::MissingRedirect { path: index_path })?;
    let blog_dir = Path::new(&target).parent().unwrap_or_else(|| Path::new(""));
    Ok(site_root.join(blog_dir).join(ENTRIES_DIR))
}

/// All entry pages of an exported site, sorted by path.
pub fn discover_entries(site_root: &Path) -> Result<Vec<PathBuf>, DiscoverError> {
    let root = blog_entries_root(site_root)?;
    let mut entries = Vec::new();
    collect_html(&root, ENTRY_DEPTH, &mut entries)?;
    entries.sort();
    Ok(entries)
}

fn redirect_target(html: &str) -> Option<String> {
    let start = html.find(REDIRECT_MARKER)? + REDIRECT_MARKER.len();
    let rest = &html[start..];
    let end = rest.find('"').unwrap_or(rest.len());
    let target = percent_decode_str(rest[..end].trim())
        .decode_utf8_lossy()
        .into_owned();
    (!target.is_empty()).then_some(target)
}

fn collect_html(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) -> Result<(), DiscoverError> {
    let read_dir = fs::read_dir(dir).map_err(|source| DiscoverError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for item in read_dir {
        let item = item.map_err(|source| DiscoverError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = item.path();
        if depth > 1 {
            if path.is_dir() {
                collect_html(&path, depth - 1, out)?;
            }
        } else if path.is_file() && path.extension().is_some_and(|ext| ext == "html") {
            out.push(path);
        }
    }
    Ok(())
}
