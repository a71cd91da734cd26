use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::error::{PipegenError, Result};

use super::types::{GitLabPipeline, GitLabProject};

/// Thin client over the GitLab REST API (v4).
pub struct GitLabClient {
    client: Client,
    api_url: Url,
    token: Option<Token>,
}

impl GitLabClient {
    pub fn new(base_url: &str, token: Option<Token>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("pipegen/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PipegenError::Config(format!("Failed to create HTTP client: {e}")))?;

        // Without a trailing slash `join` would drop the last path segment
        // of instances hosted under a sub-path.
        let base = format!("{}/", base_url.trim_end_matches('/'));
        let api_url = Url::parse(&base)
            .map_err(|e| PipegenError::Config(format!("Invalid base URL: {e}")))?
            .join("api/v4/")
            .map_err(|e| PipegenError::Config(format!("Invalid API base URL: {e}")))?;

        Ok(Self {
            client,
            api_url,
            token,
        })
    }

    /// Helper to build authenticated requests
    pub fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.token {
            request.bearer_auth(token.as_str())
        } else {
            request
        }
    }

    /// Construct project base URL
    pub fn project_url(&self, project_id: &str) -> Result<Url> {
        self.api_url
            .join(&format!("projects/{}/", urlencoding::encode(project_id)))
            .map_err(|e| PipegenError::Config(format!("Invalid project URL: {e}")))
    }

    /// Projects the authenticated user is a member of.
    pub async fn list_projects(&self, per_page: usize) -> Result<Vec<GitLabProject>> {
        let mut url = self
            .api_url
            .join("projects")
            .map_err(|e| PipegenError::Config(format!("Invalid projects URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("membership", "true")
            .append_pair("simple", "true")
            .append_pair("order_by", "last_activity_at")
            .append_pair("per_page", &per_page.to_string());

        self.get_json(url).await
    }

    /// Most recent pipelines of a project, optionally filtered by git ref.
    pub async fn list_pipelines(
        &self,
        project_id: &str,
        ref_: Option<&str>,
        per_page: usize,
    ) -> Result<Vec<GitLabPipeline>> {
        let mut url = self
            .project_url(project_id)?
            .join("pipelines")
            .map_err(|e| PipegenError::Config(format!("Invalid pipelines URL: {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("per_page", &per_page.to_string());
            if let Some(ref_) = ref_ {
                query.append_pair("ref", ref_);
            }
        }

        self.get_json(url).await
    }

    async fn get_json<T>(&self, url: Url) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!("GET {url}");
        let response = self.auth_request(self.client.get(url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(PipegenError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
