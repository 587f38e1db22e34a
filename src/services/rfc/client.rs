// SAP RFC gateway client
// Invokes remote function modules through the JSON-over-HTTP RFC gateway:
// POST {gateway}/rfc/{FUNCTION} with IMPORT parameters and TABLES in the
// body, EXPORT parameters and TABLES in the response. Everything inside
// those maps is keyed by the ABAP field names the remote interface fixes.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::ReturnMessage;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum RfcError {
    #[error("RFC gateway error ({0}): {1}")]
    ApiError(StatusCode, String),

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Function module not found: {0}")]
    FunctionNotFound(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing export parameter: {0}")]
    MissingExport(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, RfcError>;

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone)]
pub struct RfcConfig {
    pub host: String,
    /// Two-digit instance number, e.g. "00".
    pub system_number: String,
    pub system_id: String,
    /// Three-digit logon client, e.g. "100".
    pub client: String,
    pub user: String,
    pub password: String,
    pub language: String,
    /// Explicit gateway endpoint. Overrides the URL derived from host and
    /// system number (proxied gateways, tests).
    pub gateway_url: Option<String>,
}

impl RfcConfig {
    pub fn validate(&self) -> Result<()> {
        if self.gateway_url.is_none() {
            if self.host.is_empty() {
                return Err(RfcError::ConfigError("host is required".to_string()));
            }
            if self.system_number.len() != 2 || !self.system_number.chars().all(|c| c.is_ascii_digit()) {
                return Err(RfcError::ConfigError(
                    "system_number must be two digits".to_string(),
                ));
            }
        }
        if self.client.len() != 3 || !self.client.chars().all(|c| c.is_ascii_digit()) {
            return Err(RfcError::ConfigError("client must be three digits".to_string()));
        }
        if self.user.is_empty() {
            return Err(RfcError::ConfigError("user is required".to_string()));
        }
        if self.password.is_empty() {
            return Err(RfcError::ConfigError("password is required".to_string()));
        }
        if self.language.is_empty() {
            return Err(RfcError::ConfigError("language is required".to_string()));
        }
        Ok(())
    }

    /// Gateway base URL. The derived form follows the ICF HTTP port
    /// convention 80NN for instance NN.
    pub fn base_url(&self) -> String {
        match &self.gateway_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:80{}", self.host, self.system_number),
        }
    }
}

// ============================================================================
// Request / Response Wire Shapes
// ============================================================================

/// One remote function call: IMPORT parameters (scalars and structures)
/// and TABLES, both keyed by ABAP names.
#[derive(Debug, Clone, Serialize)]
pub struct RfcRequest {
    #[serde(skip)]
    function: String,

    #[serde(rename = "IMPORT")]
    imports: Map<String, Value>,

    #[serde(rename = "TABLES")]
    tables: Map<String, Value>,
}

impl RfcRequest {
    pub fn new(function: &str) -> Self {
        Self {
            function: function.to_string(),
            imports: Map::new(),
            tables: Map::new(),
        }
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn import<T: Serialize>(mut self, name: &str, value: &T) -> Result<Self> {
        self.imports.insert(name.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }

    pub fn table<T: Serialize>(mut self, name: &str, rows: &[T]) -> Result<Self> {
        self.tables.insert(name.to_string(), serde_json::to_value(rows)?);
        Ok(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RfcResponse {
    #[serde(rename = "EXPORT", default)]
    exports: Map<String, Value>,

    #[serde(rename = "TABLES", default)]
    tables: Map<String, Value>,
}

impl RfcResponse {
    pub fn export_str(&self, name: &str) -> Result<String> {
        self.exports
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| RfcError::MissingExport(name.to_string()))
    }

    /// Typed rows of a named table. A table the gateway omitted reads as
    /// empty, which is how the RFC layer reports "no rows".
    pub fn table<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        match self.tables.get(name) {
            Some(rows) => Ok(serde_json::from_value(rows.clone())?),
            None => Ok(Vec::new()),
        }
    }

    /// The standard RETURN diagnostics table.
    pub fn return_messages(&self) -> Result<Vec<ReturnMessage>> {
        self.table("RETURN")
    }
}

// ============================================================================
// RFC Client
// ============================================================================

#[derive(Clone)]
pub struct RfcClient {
    config: RfcConfig,
    http_client: Client,
}

impl RfcClient {
    pub fn new(config: RfcConfig) -> Result<Self> {
        config.validate()?;

        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(RfcError::NetworkError)?;

        Ok(Self { config, http_client })
    }

    pub fn config(&self) -> &RfcConfig {
        &self.config
    }

    /// One blocking round trip to the named function module. No retry; a
    /// failed, uncommitted call is rolled back by the remote system.
    pub async fn call(&self, request: &RfcRequest) -> Result<RfcResponse> {
        let url = format!("{}/rfc/{}", self.config.base_url(), request.function());

        tracing::debug!("Invoking {} on {}", request.function(), self.config.base_url());

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.config.user, Some(&self.config.password))
            .header("sap-client", &self.config.client)
            .header("sap-language", &self.config.language)
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status {
                StatusCode::NOT_FOUND => RfcError::FunctionNotFound(request.function().to_string()),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RfcError::AuthError(error_text),
                _ => RfcError::ApiError(status, error_text),
            });
        }

        response.json().await.map_err(RfcError::NetworkError)
    }

    /// BAPI_TRANSACTION_COMMIT with the synchronous-wait flag, so the
    /// update task has finished when the call returns.
    pub async fn commit_transaction(&self) -> Result<Vec<ReturnMessage>> {
        let request = RfcRequest::new("BAPI_TRANSACTION_COMMIT").import("WAIT", &"X")?;
        let response = self.call(&request).await?;
        response.return_messages()
    }

    /// Round-trip probe via RFC_PING.
    pub async fn test_connection(&self) -> Result<bool> {
        self.call(&RfcRequest::new("RFC_PING")).await?;
        Ok(true)
    }
}

// ============================================================================
// Tests
// ============================================================================
