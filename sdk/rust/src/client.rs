use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const STORAGE_PATH: &str = "/proxy/storage/";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("proxy returned error status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed storage payload: {0}")]
    Payload(#[from] base64::DecodeError),
}

/// One registration, as sent on create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSystem {
    #[serde(rename = "StorageType")]
    pub storage_type: String,
    #[serde(rename = "Endpoint")]
    pub endpoint: String,
    #[serde(rename = "SystemId")]
    pub system_id: String,
    #[serde(rename = "UserName")]
    pub user_name: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "Insecure")]
    pub insecure: bool,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "Storage")]
    storage: String,
}

pub struct StorageClient {
    client: Client,
    proxy_url: String,
}

impl StorageClient {
    pub fn new(proxy_url: &str) -> Self {
        Self {
            client: Client::new(),
            proxy_url: proxy_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self) -> String {
        format!("{}{}", self.proxy_url, STORAGE_PATH)
    }

    fn keyed(
        &self,
        builder: RequestBuilder,
        storage_type: &str,
        system_id: &str,
    ) -> RequestBuilder {
        builder.query(&[("StorageType", storage_type), ("SystemId", system_id)])
    }

    /// Register a new storage system.
    pub async fn create(&self, system: &StorageSystem) -> Result<(), ClientError> {
        let resp = self.client.post(self.url()).json(system).send().await?;
        check(resp).await.map(drop)
    }

    /// Replace an existing registration.
    pub async fn update(&self, system: &StorageSystem) -> Result<(), ClientError> {
        let resp = self.client.patch(self.url()).json(system).send().await?;
        check(resp).await.map(drop)
    }

    /// Raw payload describing one registration.
    pub async fn get(&self, storage_type: &str, system_id: &str) -> Result<Vec<u8>, ClientError> {
        let request = self.keyed(self.client.get(self.url()), storage_type, system_id);
        payload(check(request.send().await?).await?).await
    }

    /// Raw payload describing every registration.
    pub async fn list(&self) -> Result<Vec<u8>, ClientError> {
        let resp = self.client.get(self.url()).send().await?;
        payload(check(resp).await?).await
    }

    pub async fn delete(&self, storage_type: &str, system_id: &str) -> Result<(), ClientError> {
        let request = self.keyed(self.client.delete(self.url()), storage_type, system_id);
        check(request.send().await?).await.map(drop)
    }
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Status { status, body })
}

async fn payload(resp: reqwest::Response) -> Result<Vec<u8>, ClientError> {
    let envelope: Envelope = resp.json().await?;
    Ok(STANDARD.decode(envelope.storage)?)
}
