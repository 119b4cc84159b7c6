use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::{ApiFailure, FailureKind, MediaFile, NewPost, UploadedMedia};

pub const DEFAULT_API_BASE: &str = "https://public-api.wordpress.com/rest/v1.1";
const HOSTED_SITE_SUFFIX: &str = ".wordpress.com";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// REST root, without a trailing `/sites`.
    pub api_base: String,
    /// Site name (`myblog`) or full host (`myblog.example.org`).
    pub site: String,
    pub token: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ClientSettings {
    pub fn new(site: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            site: site.into(),
            token: token.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// The two calls the migration needs from the target platform.
#[async_trait::async_trait]
pub trait SiteApi: Send + Sync {
    /// Upload files in one request; the result is index-aligned with `files`.
    async fn upload_media(&self, files: Vec<MediaFile>) -> Result<Vec<UploadedMedia>, ApiFailure>;

    /// Create a post and return its ID.
    async fn create_post(&self, post: &NewPost) -> Result<u64, ApiFailure>;
}

#[derive(Debug, Clone)]
pub struct WordPressClient {
    client: reqwest::Client,
    token: String,
    media_url: Url,
    posts_url: Url,
}

#[derive(Debug, Deserialize)]
struct MediaResponse {
    #[serde(default)]
    media: Vec<MediaItem>,
}

#[derive(Debug, Deserialize)]
struct MediaItem {
    #[serde(rename = "ID")]
    id: u64,
    #[serde(rename = "URL")]
    url: String,
}

#[derive(Debug, Deserialize)]
struct PostResponse {
    #[serde(rename = "ID")]
    id: u64,
}

impl WordPressClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiFailure> {
        let site_root = format!(
            "{}/sites/{}",
            settings.api_base.trim_end_matches('/'),
            site_host(&settings.site)
        );
        let media_url = parse_endpoint(&format!("{site_root}/media/new"))?;
        let posts_url = parse_endpoint(&format!("{site_root}/posts/new"))?;

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiFailure::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            client,
            token: settings.token,
            media_url,
            posts_url,
        })
    }

    pub fn media_url(&self) -> &Url {
        &self.media_url
    }

    pub fn posts_url(&self) -> &Url {
        &self.posts_url
    }
}

#[async_trait::async_trait]
impl SiteApi for WordPressClient {
    async fn upload_media(&self, files: Vec<MediaFile>) -> Result<Vec<UploadedMedia>, ApiFailure> {
        let expected = files.len();
        let form = files
            .into_iter()
            .enumerate()
            .fold(Form::new(), |form, (index, file)| {
                form.part(
                    format!("media[{index}]"),
                    Part::bytes(file.bytes).file_name(file.file_name),
                )
            });

        let response = self
            .client
            .post(self.media_url.clone())
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body: MediaResponse = read_json(response).await?;

        if body.media.len() < expected {
            return Err(ApiFailure::new(
                FailureKind::MissingMedia {
                    expected,
                    actual: body.media.len(),
                },
                "media response shorter than upload",
            ));
        }

        Ok(body
            .media
            .into_iter()
            .take(expected)
            .map(|item| UploadedMedia {
                id: item.id,
                url: item.url,
            })
            .collect())
    }

    async fn create_post(&self, post: &NewPost) -> Result<u64, ApiFailure> {
        let mut fields = vec![
            ("title", post.title.clone()),
            ("date", post.date.format("%Y-%m-%d").to_string()),
            ("content", post.content.clone()),
        ];
        if let Some(slug) = &post.slug {
            fields.push(("slug", slug.clone()));
        }
        if let Some(media_id) = post.featured_image {
            fields.push(("featured_image", media_id.to_string()));
        }

        let response = self
            .client
            .post(self.posts_url.clone())
            .bearer_auth(&self.token)
            .form(&fields)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body: PostResponse = read_json(response).await?;
        Ok(body.id)
    }
}

/// Hosted site names are short; anything with a dot is taken as a host.
fn site_host(site: &str) -> String {
    if site.contains('.') {
        site.to_string()
    } else {
        format!("{site}{HOSTED_SITE_SUFFIX}")
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, ApiFailure> {
    Url::parse(raw).map_err(|err| ApiFailure::new(FailureKind::InvalidUrl, format!("{raw}: {err}")))
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiFailure> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiFailure::new(
            FailureKind::HttpStatus(status.as_u16()),
            format!("{status}: {body}"),
        ));
    }

    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&bytes)
        .map_err(|err| ApiFailure::new(FailureKind::InvalidResponse, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiFailure {
    if err.is_timeout() {
        return ApiFailure::new(FailureKind::Timeout, err.to_string());
    }
    ApiFailure::new(FailureKind::Network, err.to_string())
}
