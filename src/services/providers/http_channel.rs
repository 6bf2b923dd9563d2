//! Remote content provider reached over HTTP
//!
//! Lists trailer media via `GET {api_url}/trailers?user_id=<uuid>`, which
//! returns a JSON array of media items.

use std::time::Duration;

use reqwest::Client as HttpClient;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{AppError, AppResult},
    models::{ItemKind, MediaItem, UserContext},
    services::ChannelService,
};

#[derive(Clone)]
pub struct HttpChannelProvider {
    http_client: HttpClient,
    api_url: String,
}

impl HttpChannelProvider {
    pub fn new(api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_trailers(&self, user: &UserContext) -> AppResult<Vec<MediaItem>> {
        let url = format!("{}/trailers", self.api_url);
        let user_id = user.id.to_string();

        let response = self
            .http_client
            .get(&url)
            .query(&[("user_id", user_id.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body,
                "Channel trailer request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "Channel API returned status {}: {}",
                status, body
            )));
        }

        let items: Vec<MediaItem> = response.json().await?;

        // Providers occasionally mix in other media; keep trailers only
        let trailers: Vec<MediaItem> = items
            .into_iter()
            .filter(|item| item.kind == ItemKind::Trailer)
            .collect();

        tracing::info!(
            user = %user.id,
            trailers = trailers.len(),
            provider = "http_channel",
            "Channel trailers fetched"
        );

        Ok(trailers)
    }
}

#[async_trait::async_trait]
impl ChannelService for HttpChannelProvider {
    async fn query_remote_trailers(
        &self,
        user: &UserContext,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<MediaItem>> {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(user = %user.id, "Channel trailer query cancelled");
                Err(AppError::Cancelled)
            }
            result = self.fetch_trailers(user) => result,
        }
    }
}
