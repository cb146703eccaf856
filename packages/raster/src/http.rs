//! HTTP implementation of the imagery service boundary.
//!
//! Talks to a JSON expression API: `POST /v1/composite`, `POST
//! /v1/reduce`, and `POST /v1/tiles`, authenticated with a bearer key and
//! a project identifier. Every round trip carries an explicit request
//! timeout and a small bounded retry on transport errors only; an HTTP
//! error status is never retried.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::{
    BandValues, CompositeSpec, ImageryService, RasterError, RasterExpr, ReduceParams, SceneHandle,
    TileLayer, VisParams,
};

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of retries after a transport failure.
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Connection settings for [`HttpImageryService`].
#[derive(Debug, Clone)]
pub struct ImageryServiceConfig {
    /// Service base URL (no trailing slash required).
    pub base_url: String,
    /// Bearer API key.
    pub api_key: String,
    /// Project identifier the session is scoped to.
    pub project: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retries after transport failures (timeouts, connection errors).
    pub max_retries: u32,
}

impl ImageryServiceConfig {
    /// Builds a config with default timeout and retry settings.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            project: project.into(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Reads the config from `FLOOD_WATCH_RASTER_URL`,
    /// `FLOOD_WATCH_RASTER_KEY` and `FLOOD_WATCH_RASTER_PROJECT`.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Auth`] naming the first missing variable.
    pub fn from_env() -> Result<Self, RasterError> {
        let var = |name: &str| {
            std::env::var(name).map_err(|_| RasterError::Auth {
                message: format!("{name} is not set"),
            })
        };
        Ok(Self::new(
            var("FLOOD_WATCH_RASTER_URL")?,
            var("FLOOD_WATCH_RASTER_KEY")?,
            var("FLOOD_WATCH_RASTER_PROJECT")?,
        ))
    }
}

/// Reqwest-backed [`ImageryService`].
pub struct HttpImageryService {
    client: reqwest::Client,
    config: ImageryServiceConfig,
}

impl HttpImageryService {
    /// Creates the service client.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Http`] if the underlying client cannot be
    /// constructed.
    pub fn new(config: ImageryServiceConfig) -> Result<Self, RasterError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Performs the startup handshake against the configured project.
    ///
    /// Must succeed before the server starts taking requests; an
    /// unreachable or rejecting service is fatal at startup.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Auth`] when the service rejects the key or
    /// project, or another [`RasterError`] for transport failures.
    pub async fn init(&self) -> Result<(), RasterError> {
        let url = format!(
            "{}/v1/projects/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.project
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            log::info!("Imagery service session established for project {}", self.config.project);
            return Ok(());
        }
        let message = Self::error_detail(response).await;
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RasterError::Auth { message });
        }
        Err(RasterError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// Sends a JSON request, retrying transport failures up to the
    /// configured bound. HTTP error statuses are returned immediately.
    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, RasterError> {
        let url = format!("{}/{path}", self.config.base_url.trim_end_matches('/'));
        let mut attempt = 0;
        loop {
            let result = self
                .client
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(body)
                .send()
                .await;

            match result {
                Ok(response) => return Self::handle_response(response).await,
                Err(err) if attempt < self.config.max_retries && is_transient(&err) => {
                    attempt += 1;
                    log::warn!(
                        "Imagery service request to {path} failed ({err}); retry {attempt}/{}",
                        self.config.max_retries
                    );
                }
                Err(err) => return Err(RasterError::Http(err)),
            }
        }
    }

    async fn handle_response(response: reqwest::Response) -> Result<serde_json::Value, RasterError> {
        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(|err| RasterError::Parse {
                message: format!("Invalid JSON from imagery service: {err}"),
            });
        }
        let message = Self::error_detail(response).await;
        Err(RasterError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// Extracts the `error` field from an error body, falling back to the
    /// raw text (truncated).
    async fn error_detail(response: reqwest::Response) -> String {
        let text = response.text().await.unwrap_or_default();
        serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| text.chars().take(200).collect())
    }
}

/// Whether a transport error is worth retrying.
fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

#[async_trait]
impl ImageryService for HttpImageryService {
    async fn composite(&self, spec: &CompositeSpec) -> Result<SceneHandle, RasterError> {
        let body = json!({
            "project": self.config.project,
            "composite": spec,
        });
        let response = self.post_json("v1/composite", &body).await?;
        let id = response
            .get("scene")
            .and_then(|s| s.as_str())
            .ok_or_else(|| RasterError::Parse {
                message: "Missing scene id in composite response".to_string(),
            })?;
        Ok(SceneHandle { id: id.to_string() })
    }

    async fn reduce_mean(
        &self,
        raster: &RasterExpr,
        region: &geojson::Geometry,
        params: &ReduceParams,
    ) -> Result<BandValues, RasterError> {
        let body = json!({
            "project": self.config.project,
            "expression": raster,
            "region": region,
            "reducer": "mean",
            "scale_meters": params.scale_meters,
            "max_samples": params.max_samples,
        });
        let response = self.post_json("v1/reduce", &body).await?;
        let bands = response.get("bands").ok_or_else(|| RasterError::Parse {
            message: "Missing bands in reduce response".to_string(),
        })?;
        serde_json::from_value(bands.clone()).map_err(|err| RasterError::Parse {
            message: format!("Invalid bands in reduce response: {err}"),
        })
    }

    async fn tile_layer(
        &self,
        raster: &RasterExpr,
        vis: &VisParams,
    ) -> Result<TileLayer, RasterError> {
        let body = json!({
            "project": self.config.project,
            "expression": raster,
            "vis": vis,
        });
        let response = self.post_json("v1/tiles", &body).await?;
        let url_format = response
            .get("url_format")
            .and_then(|u| u.as_str())
            .ok_or_else(|| RasterError::Parse {
                message: "Missing url_format in tiles response".to_string(),
            })?;
        Ok(TileLayer {
            url_format: url_format.to_string(),
        })
    }
}
