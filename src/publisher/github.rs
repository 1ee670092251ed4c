//! Minimal GitHub REST client for the release repository.
//!
//! Every request authenticates with HTTP basic auth (account + token) and
//! asks for the GitHub JSON media type. Non-success statuses become
//! [`Error::Api`] carrying the method, URL, status and response body.

use super::error::{Error, ErrorExt, Result};
use super::mime;
use crate::plugin::CommitInfo;
use crate::settings::Settings;
use regex::Regex;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

const ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// A release as returned by the releases API.
#[derive(Clone, Debug, Deserialize)]
pub struct Release {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tag_name: String,
    pub html_url: String,
    #[serde(default)]
    pub upload_url: String,
}

/// An uploaded release asset.
#[derive(Clone, Debug, Deserialize)]
pub struct Asset {
    pub browser_download_url: String,
}

/// Payload for creating a release.
#[derive(Clone, Debug, Serialize)]
pub struct NewRelease {
    pub tag_name: String,
    pub target_commitish: String,
    pub name: String,
}

/// Authenticated client bound to one release repository.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    repository: String,
    account: String,
    token: String,
    next_link: Regex,
}

impl GitHubClient {
    /// Builds a client from the publish settings and a token.
    pub fn new(settings: &Settings, token: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_base: settings.api_base().to_string(),
            repository: settings.repository().to_string(),
            account: settings.account().to_string(),
            token: token.into(),
            next_link: Regex::new(r#"<([^>]+)>;\s*rel="next""#)?,
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}/{path}", self.api_base, self.repository)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.account, Some(&self.token))
    }

    async fn send(&self, method: Method, url: &str) -> Result<Response> {
        let response = self.request(method.clone(), url).send().await?;
        check(&method, url, response).await
    }

    /// Follows `Link: rel="next"` from `url` and concatenates every page.
    pub async fn paginate<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(url.to_string());

        while let Some(page) = next.take() {
            log::debug!("GET {page}");
            let response = self.send(Method::GET, &page).await?;
            next = response
                .headers()
                .get(header::LINK)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| self.next_link.captures(value))
                .map(|captures| captures[1].to_string());
            let batch: Vec<T> = response.json().await?;
            items.extend(batch);
        }

        Ok(items)
    }

    /// All releases of the repository.
    pub async fn list_releases(&self) -> Result<Vec<Release>> {
        self.paginate(&self.repo_url("releases")).await
    }

    /// One release by id.
    pub async fn get_release(&self, id: u64) -> Result<Release> {
        let url = self.repo_url(&format!("releases/{id}"));
        Ok(self.send(Method::GET, &url).await?.json().await?)
    }

    pub async fn delete_release(&self, id: u64) -> Result<()> {
        let url = self.repo_url(&format!("releases/{id}"));
        self.send(Method::DELETE, &url).await?;
        Ok(())
    }

    /// Whether `refs/tags/{tag}` exists.
    ///
    /// Only a 404 counts as absent; any other status is treated as present.
    pub async fn tag_exists(&self, tag: &str) -> Result<bool> {
        let url = self.repo_url(&format!("git/refs/tags/{tag}"));
        let response = self.request(Method::GET, &url).send().await?;
        Ok(response.status() != StatusCode::NOT_FOUND)
    }

    pub async fn delete_tag(&self, tag: &str) -> Result<()> {
        let url = self.repo_url(&format!("git/refs/tags/{tag}"));
        self.send(Method::DELETE, &url).await?;
        Ok(())
    }

    /// Creates a release and returns it.
    pub async fn create_release(&self, release: &NewRelease) -> Result<Release> {
        let url = self.repo_url("releases");
        let response = self.request(Method::POST, &url).json(release).send().await?;
        Ok(check(&Method::POST, &url, response).await?.json().await?)
    }

    /// Replaces the body text of a release.
    pub async fn update_release_body(&self, id: u64, body: &str) -> Result<()> {
        let url = self.repo_url(&format!("releases/{id}"));
        let response = self
            .request(Method::PATCH, &url)
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await?;
        check(&Method::PATCH, &url, response).await?;
        Ok(())
    }

    /// Uploads the file at `path` to release `id`, named and labelled after
    /// the file.
    ///
    /// The upload endpoint is taken from the release's `upload_url`.
    pub async fn upload_asset(&self, id: u64, path: &Path) -> Result<Asset> {
        if !path.is_file() {
            return Err(Error::NotAFile(path.to_path_buf()));
        }
        let name = file_name(path)?;

        let release = self.get_release(id).await?;
        let url = upload_target(&release.upload_url, &name)?;
        let content_type = mime::detect(path).await?;
        let bytes = tokio::fs::read(path).await.fs_context("reading asset", path)?;

        log::debug!("POST {url} ({content_type}, {} bytes)", bytes.len());
        let response = self
            .request(Method::POST, url.as_str())
            .header(header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        Ok(check(&Method::POST, url.as_str(), response).await?.json().await?)
    }

    /// Commit metadata for `sha` in `owner/repo` (not necessarily the
    /// release repository).
    pub async fn get_commit(&self, owner: &str, repo: &str, sha: &str) -> Result<CommitInfo> {
        let url = format!("{}/repos/{owner}/{repo}/commits/{sha}", self.api_base);
        Ok(self.send(Method::GET, &url).await?.json().await?)
    }
}

async fn check(method: &Method, url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::Api {
        method: method.to_string(),
        url: url.to_string(),
        status: status.as_u16(),
        body,
    })
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| Error::NotAFile(path.to_path_buf()))
}

/// Expands an `upload_url` template (`...assets{?name,label}`) into the
/// concrete upload URL for `name`.
pub fn upload_target(template: &str, name: &str) -> Result<Url> {
    let base = template.split('{').next().unwrap_or(template);
    let mut url = Url::parse(base).map_err(|source| Error::InvalidUrl {
        url: template.to_string(),
        source,
    })?;
    url.query_pairs_mut()
        .clear()
        .append_pair("name", name)
        .append_pair("label", name);
    Ok(url)
}
