//! 解析サーバー HTTP クライアント

use super::{AnalysisApi, ApiError, ApiResult, DatasetFile};
use async_trait::async_trait;
use log::debug;
use reqwest::{multipart, Client, Response, Url};
use review_intel_common::{
    extract_detail, parse_response, AnalysisResult, PredictionRequest, PredictionResult,
    SampleDataset, UploadInfo,
};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Clone)]
pub struct HttpAnalysisClient {
    client: Client,
    base_url: String,
}

impl HttpAnalysisClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Request(format!("HTTPクライアントを作成できません: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// サンプル読み込みのURL（IDは1つのパス要素としてエンコードされる）
    fn load_sample_url(&self, dataset_id: &str) -> ApiResult<Url> {
        let mut url = Url::parse(&self.endpoint("load-sample"))
            .map_err(|e| ApiError::Request(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Request(format!("invalid base url: {}", self.base_url)))?
            .push(dataset_id);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> ApiResult<Response> {
        request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }
}

/// 応答を検査してパースする
async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !status.is_success() {
        debug!("HTTP {}: {}", status, body);
        return Err(ApiError::Server {
            status: status.as_u16(),
            detail: extract_detail(&body),
        });
    }

    Ok(parse_response(&body)?)
}

#[async_trait]
impl AnalysisApi for HttpAnalysisClient {
    async fn upload_dataset(&self, file: DatasetFile) -> ApiResult<UploadInfo> {
        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str("text/csv")
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .send(self.client.post(self.endpoint("upload")).multipart(form))
            .await?;
        read_json(response).await
    }

    async fn load_sample_dataset(&self, dataset_id: &str) -> ApiResult<UploadInfo> {
        let url = self.load_sample_url(dataset_id)?;
        let response = self.send(self.client.post(url)).await?;
        read_json(response).await
    }

    async fn list_sample_datasets(&self) -> ApiResult<Vec<SampleDataset>> {
        let response = self.send(self.client.get(self.endpoint("sample-data"))).await?;
        read_json(response).await
    }

    async fn analyze(&self, file_id: &str) -> ApiResult<AnalysisResult> {
        let response = self
            .send(
                self.client
                    .post(self.endpoint("analyze"))
                    .query(&[("file_id", file_id)]),
            )
            .await?;
        read_json(response).await
    }

    async fn predict(&self, text: &str) -> ApiResult<PredictionResult> {
        let body = PredictionRequest {
            text: text.to_string(),
        };
        let response = self
            .send(self.client.post(self.endpoint("predict")).json(&body))
            .await?;
        read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> HttpAnalysisClient {
        HttpAnalysisClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = client("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.endpoint("upload"), "http://localhost:8000/api/upload");
    }

    #[test]
    fn test_load_sample_url_encodes_id() {
        let client = client("http://localhost:8000");
        assert_eq!(
            client.load_sample_url("electronics_reviews.csv").unwrap().as_str(),
            "http://localhost:8000/api/load-sample/electronics_reviews.csv"
        );
        assert_eq!(
            client.load_sample_url("../secret").unwrap().as_str(),
            "http://localhost:8000/api/load-sample/..%2Fsecret"
        );
        assert_eq!(
            client.load_sample_url("my data.csv").unwrap().as_str(),
            "http://localhost:8000/api/load-sample/my%20data.csv"
        );
    }

    #[test]
    fn test_load_sample_url_rejects_bad_base() {
        let client = client("not a url");
        assert!(matches!(
            client.load_sample_url("books.csv"),
            Err(ApiError::Request(_))
        ));
    }
}
