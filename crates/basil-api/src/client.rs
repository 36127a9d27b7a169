//! Basil REST backend client
//!
//! Thin blocking wrapper over the backend endpoints:
//! - `GET /api/organizations`, `/api/statuses`, `/api/station-types`
//! - `GET /api/basil` to list plant records
//! - `POST /api/basil` to register a plant

use basil_core::{DraftError, Organization};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A lookup list (organizations, statuses, station types) could not be
    /// loaded. Callers recover with a built-in list.
    #[error("{resource} unavailable: {reason}")]
    DirectoryUnavailable {
        resource: &'static str,
        reason: String,
    },

    #[error("Failed to create plant: {0}")]
    SubmissionFailed(String),

    #[error("Plant {0} is already registered; open a new form for the next plant")]
    FormClosed(String),

    #[error("Failed to {action}: {reason}")]
    RequestFailed {
        action: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Everything the front-end needs from the backend.
pub trait PlantBackend {
    /// Organizations as reported, before access rules are applied.
    fn fetch_organizations(&self) -> Result<Vec<Organization>, ApiError>;

    fn fetch_statuses(&self) -> Result<Vec<String>, ApiError>;

    fn fetch_station_types(&self) -> Result<Vec<String>, ApiError>;

    fn list_plants(&self) -> Result<Vec<PlantRecord>, ApiError>;

    /// Register a plant. `Ok(None)` means the backend accepted it without
    /// returning a body.
    fn create_plant(&self, payload: &Value) -> Result<Option<Value>, ApiError>;
}

/// A plant record as listed by the backend. Only `id` is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PlantRecord {
    /// A field rendered for display; strings lose their quotes.
    pub fn field(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// Label of a status or station entry: a bare string, or an object's
/// `name` falling back to its `id`.
pub fn option_label(value: &Value) -> Option<String> {
    let label = match value {
        Value::String(s) => s.clone(),
        Value::Object(obj) => match obj.get("name").or_else(|| obj.get("id"))? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        },
        _ => return None,
    };
    (!label.is_empty()).then_some(label)
}

pub struct ApiClient {
    client: Client,
    config: Config,
}

impl ApiClient {
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let user_agent = format!("basil/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, String> {
        let url = self.config.endpoint(path);
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.describe(e))?;
        let response = check_response(response)?;
        response
            .json()
            .map_err(|e| format!("invalid response body: {e}"))
    }

    fn fetch_options(&self, path: &str, resource: &'static str) -> Result<Vec<String>, ApiError> {
        let values: Vec<Value> =
            self.get_json(path)
                .map_err(|reason| ApiError::DirectoryUnavailable { resource, reason })?;
        Ok(values.iter().filter_map(option_label).collect())
    }

    fn describe(&self, err: reqwest::Error) -> String {
        if err.is_timeout() {
            format!("request timed out after {}s", self.config.timeout.as_secs_f32())
        } else if err.is_connect() {
            format!("could not connect to {}", self.config.api_url)
        } else {
            err.to_string()
        }
    }
}

fn check_response(response: Response) -> Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    if body.trim().is_empty() {
        Err(format!("server returned {status}"))
    } else {
        Err(format!("server returned {status}: {}", body.trim()))
    }
}

impl PlantBackend for ApiClient {
    fn fetch_organizations(&self) -> Result<Vec<Organization>, ApiError> {
        self.get_json("organizations")
            .map_err(|reason| ApiError::DirectoryUnavailable {
                resource: "Organization directory",
                reason,
            })
    }

    fn fetch_statuses(&self) -> Result<Vec<String>, ApiError> {
        self.fetch_options("statuses", "Status list")
    }

    fn fetch_station_types(&self) -> Result<Vec<String>, ApiError> {
        self.fetch_options("station-types", "Station type list")
    }

    fn list_plants(&self) -> Result<Vec<PlantRecord>, ApiError> {
        self.get_json("basil")
            .map_err(|reason| ApiError::RequestFailed {
                action: "get basil records",
                reason,
            })
    }

    fn create_plant(&self, payload: &Value) -> Result<Option<Value>, ApiError> {
        let url = self.config.endpoint("basil");
        log::debug!("POST {} {}", url, payload);
        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .map_err(|e| ApiError::SubmissionFailed(self.describe(e)))?;
        let response = check_response(response).map_err(ApiError::SubmissionFailed)?;

        let body = response
            .text()
            .map_err(|e| ApiError::SubmissionFailed(format!("failed to read response: {e}")))?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(
            serde_json::from_str(&body).unwrap_or(Value::String(body)),
        ))
    }
}
