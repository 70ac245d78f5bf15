//! The remote Feature Store as seen from the map.

use std::time::Duration;

use async_trait::async_trait;
use plot_protocol::{
    CreatePlotRequest, ErrorResponse, FeatureCollection, PlotRecord, UpdatePlotRequest,
    UpdatePlotResponse,
};
use reqwest::{Client, StatusCode};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{ClientError, ClientResult};

pub const GEOJSON_PATH: &str = "plots/geojson";
pub const STORE_PATH: &str = "plots/plots";
pub const UPDATE_PATH: &str = "plots/update";

#[async_trait]
pub trait PlotStore: Send + Sync {
    async fn fetch_features(&self) -> ClientResult<FeatureCollection>;

    async fn create_plot(&self, request: &CreatePlotRequest) -> ClientResult<PlotRecord>;

    async fn update_plot(&self, request: &UpdatePlotRequest) -> ClientResult<UpdatePlotResponse>;
}

#[derive(Debug, Clone)]
pub struct HttpPlotStore {
    client: Client,
    base_url: String,
}

impl HttpPlotStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::handle_response(response).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.client.put(self.url(path)).json(body).send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return match status {
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    Err(ClientError::Validation(message))
                }
                _ => Err(ClientError::Server {
                    status: status.as_u16(),
                    message,
                }),
            };
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl PlotStore for HttpPlotStore {
    async fn fetch_features(&self) -> ClientResult<FeatureCollection> {
        self.get(GEOJSON_PATH).await
    }

    async fn create_plot(&self, request: &CreatePlotRequest) -> ClientResult<PlotRecord> {
        self.post(STORE_PATH, request).await
    }

    async fn update_plot(&self, request: &UpdatePlotRequest) -> ClientResult<UpdatePlotResponse> {
        self.put(UPDATE_PATH, request).await
    }
}
