use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::error::{ReviewError, ReviewResult};
use crate::feed::{ReviewFeed, ACTIVITY_FEED, COORDINATE_FEED};
use crate::models::TimeRange;
use crate::settings::ReviewSettings;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

const VIDEO_PATH: &str = "stitched-video";

/// JSON feeds served by the processing backend.
#[derive(Clone)]
pub struct HttpFeed {
    client: Client,
    base_url: String,
}

impl HttpFeed {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ReviewResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ReviewError::feed(base_url.clone(), err))?;

        Ok(Self { client, base_url })
    }

    pub fn from_settings(settings: &ReviewSettings) -> ReviewResult<Self> {
        Self::new(settings.api_base_url.clone(), settings.fetch_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str, range: &TimeRange, extra: &[(&str, &str)]) -> ReviewResult<Url> {
        let start = range.start_wire();
        let end = range.end_wire();
        let mut params = vec![("start_time", start.as_str()), ("end_time", end.as_str())];
        params.extend_from_slice(extra);

        let raw = format!("{}/{}", self.base_url, path);
        Url::parse_with_params(&raw, &params).map_err(|err| ReviewError::feed(raw, err))
    }

    /// Where the playback surface can stream the stitched clip for `camera`.
    pub fn stitched_video_url(&self, range: &TimeRange, camera: &str) -> ReviewResult<Url> {
        self.endpoint(VIDEO_PATH, range, &[("camera_name", camera)])
    }

    async fn get_json(&self, path: &str, range: &TimeRange) -> ReviewResult<Option<Value>> {
        let url = self.endpoint(path, range, &[])?;
        log_info!("GET {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ReviewError::feed(path, err))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            log_warn!("{path}: no data for {range}");
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = if body.trim().is_empty() {
                "no details".to_string()
            } else {
                body.trim().to_string()
            };
            return Err(ReviewError::feed(path, format!("HTTP {status}: {detail}")));
        }

        response
            .json::<Value>()
            .await
            .map(Some)
            .map_err(|err| ReviewError::feed(path, format!("invalid JSON body: {err}")))
    }
}

impl ReviewFeed for HttpFeed {
    fn fetch_activity(
        &self,
        range: &TimeRange,
    ) -> impl Future<Output = ReviewResult<Option<Value>>> + Send {
        self.get_json(ACTIVITY_FEED, range)
    }

    fn fetch_coordinates(
        &self,
        range: &TimeRange,
    ) -> impl Future<Output = ReviewResult<Option<Value>>> + Send {
        self.get_json(COORDINATE_FEED, range)
    }
}
