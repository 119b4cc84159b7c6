use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use iweb_core::{ParsedEntry, IMAGE_PLACEHOLDER};
use iweb_logging::{iweb_debug, iweb_warn};
use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};

use crate::client::SiteApi;
use crate::{ApiFailure, FailureKind, MediaFile, NewPost, PublishError, UploadedMedia};

/// Most files the media endpoint accepts in one request.
pub const MAX_MEDIA_PER_REQUEST: usize = 20;

static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"{}/([^"'\s>]+)"#,
        regex::escape(IMAGE_PLACEHOLDER)
    ))
    .expect("placeholder pattern is valid")
});

/// Uploads an entry's images, fills in their URLs and creates the post.
pub struct Publisher<'a> {
    api: &'a dyn SiteApi,
    batch_size: usize,
}

impl<'a> Publisher<'a> {
    pub fn new(api: &'a dyn SiteApi) -> Self {
        Self {
            api,
            batch_size: MAX_MEDIA_PER_REQUEST,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Publish `entry`, resolving its local image paths against
    /// `image_root`, and return the new post's ID.
    ///
    /// Any failed call aborts the entry; media already uploaded stays on
    /// the platform.
    pub async fn publish(
        &self,
        entry: ParsedEntry,
        image_root: &Path,
        slug: Option<String>,
    ) -> Result<u64, PublishError> {
        let ParsedEntry {
            title,
            date,
            body,
            images,
            featured_image,
            ..
        } = entry;

        let uploaded = self.upload_images(&images, image_root).await?;
        let content = substitute_placeholders(&body, &uploaded);

        let featured_image = match featured_image {
            Some(path) => Some(self.upload_featured(&path, image_root).await?),
            None => None,
        };

        let post = NewPost {
            title,
            date,
            content,
            slug,
            featured_image,
        };
        self.api.create_post(&post).await.map_err(PublishError::Post)
    }

    /// Upload images in batches, returning `(local path, uploaded URL)` pairs
    /// in the order of `images`.
    async fn upload_images(
        &self,
        images: &[String],
        image_root: &Path,
    ) -> Result<Vec<(String, String)>, PublishError> {
        let mut uploaded = Vec::with_capacity(images.len());

        for (index, batch) in images.chunks(self.batch_size).enumerate() {
            let files = batch
                .iter()
                .map(|path| read_media_file(image_root, path))
                .collect::<Result<Vec<_>, _>>()?;
            iweb_debug!("uploading image batch {} ({} files)", index + 1, files.len());

            let media = self.upload(files).await?;
            uploaded.extend(
                batch
                    .iter()
                    .cloned()
                    .zip(media.into_iter().map(|item| item.url)),
            );
        }

        Ok(uploaded)
    }

    async fn upload_featured(&self, path: &str, image_root: &Path) -> Result<u64, PublishError> {
        let file = read_media_file(image_root, path)?;
        iweb_debug!("uploading featured image {}", path);
        let media = self.upload(vec![file]).await?;
        media
            .first()
            .map(|item| item.id)
            .ok_or_else(|| PublishError::Upload(missing_media(1, 0)))
    }

    async fn upload(&self, files: Vec<MediaFile>) -> Result<Vec<UploadedMedia>, PublishError> {
        let expected = files.len();
        let media = self
            .api
            .upload_media(files)
            .await
            .map_err(PublishError::Upload)?;
        if media.len() < expected {
            return Err(PublishError::Upload(missing_media(expected, media.len())));
        }
        Ok(media)
    }
}

/// Replace each `WP_IMAGE_PLACEHOLDER/<name>` in `body` with the URL of the
/// uploaded image whose basename is `<name>`.
///
/// Only basenames are compared, so images with the same file name in
/// different directories collide; the first uploaded one wins. Placeholders
/// without a matching upload are left in place.
pub fn substitute_placeholders(body: &str, uploaded: &[(String, String)]) -> String {
    let mut by_name: HashMap<String, &str> = HashMap::new();
    for (path, url) in uploaded {
        by_name.entry(basename(path).to_string()).or_insert(url);
    }

    PLACEHOLDER_PATTERN
        .replace_all(body, |caps: &Captures<'_>| {
            let name = percent_decode_str(&caps[1]).decode_utf8_lossy();
            match by_name.get(&*name) {
                Some(url) => url.to_string(),
                None => {
                    iweb_warn!("no uploaded image for placeholder {}", &caps[0]);
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Read one image; the file is closed again before the upload is sent.
fn read_media_file(image_root: &Path, path: &str) -> Result<MediaFile, PublishError> {
    let full_path = image_root.join(path);
    let bytes = fs::read(&full_path).map_err(|source| PublishError::ImageRead {
        path: full_path.clone(),
        source,
    })?;
    Ok(MediaFile {
        file_name: basename(path).to_string(),
        bytes,
    })
}

fn missing_media(expected: usize, actual: usize) -> ApiFailure {
    ApiFailure::new(
        FailureKind::MissingMedia { expected, actual },
        "media response shorter than upload",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pair(path: &str, url: &str) -> (String, String) {
        (path.to_string(), url.to_string())
    }

    #[test]
    fn placeholders_are_replaced_by_basename() {
        let body = r#"<img src="WP_IMAGE_PLACEHOLDER/IMG_01.jpg" alt="" /><img src="WP_IMAGE_PLACEHOLDER/IMG_02.jpg" />"#;
        let out = substitute_placeholders(
            body,
            &[
                pair("4_Trip_files/IMG_01.jpg", "https://x.files.wordpress.com/01.jpg"),
                pair("4_Trip_files/IMG_02.jpg", "https://x.files.wordpress.com/02.jpg"),
            ],
        );
        assert_eq!(
            out,
            r#"<img src="https://x.files.wordpress.com/01.jpg" alt="" /><img src="https://x.files.wordpress.com/02.jpg" />"#
        );
    }

    #[test]
    fn encoded_names_match_decoded_paths() {
        let body = r#"<img src="WP_IMAGE_PLACEHOLDER/IMG%2001.jpg" />"#;
        let out = substitute_placeholders(body, &[pair("My Trip_files/IMG 01.jpg", "https://u/1")]);
        assert_eq!(out, r#"<img src="https://u/1" />"#);
    }

    #[test]
    fn colliding_basenames_use_first_upload() {
        let body = r#"<img src="WP_IMAGE_PLACEHOLDER/a.jpg" /><img src="WP_IMAGE_PLACEHOLDER/a.jpg" />"#;
        let out = substitute_placeholders(
            body,
            &[pair("one_files/a.jpg", "https://u/1"), pair("two_files/a.jpg", "https://u/2")],
        );
        assert_eq!(out, r#"<img src="https://u/1" /><img src="https://u/1" />"#);
    }

    #[test]
    fn unmatched_placeholder_is_left_alone() {
        let body = r#"<img src="WP_IMAGE_PLACEHOLDER/missing.jpg" />"#;
        assert_eq!(substitute_placeholders(body, &[]), body);
    }
}
