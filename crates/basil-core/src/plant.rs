//! Plant creation form state and the request bodies built from it.
//!
//! The backend has accepted two shapes for a new plant over time: a minimal
//! sensor reading keyed by the QR code, and a full record carrying owner and
//! transport history. Both are available through [`PayloadStrategy`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Unknown payload strategy '{0}' (expected 'minimal' or 'full')")]
    UnknownStrategy(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub org_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportRecord {
    pub timestamp: i64,
    pub gps: String,
    pub temperature: String,
    pub humidity: String,
    pub owner: Owner,
}

/// Editable fields of a plant draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Station,
    Location,
    CurrentGps,
    Temperature,
    Humidity,
    Status,
}

impl DraftField {
    pub const ALL: [DraftField; 6] = [
        DraftField::Station,
        DraftField::Location,
        DraftField::CurrentGps,
        DraftField::Temperature,
        DraftField::Humidity,
        DraftField::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DraftField::Station => "station",
            DraftField::Location => "location",
            DraftField::CurrentGps => "currentGps",
            DraftField::Temperature => "temperature",
            DraftField::Humidity => "humidity",
            DraftField::Status => "status",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(
            self,
            DraftField::Station | DraftField::Location | DraftField::CurrentGps
        )
    }
}

impl FromStr for DraftField {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "station" | "origin" => Ok(DraftField::Station),
            "location" => Ok(DraftField::Location),
            "currentgps" | "gps" => Ok(DraftField::CurrentGps),
            "temperature" => Ok(DraftField::Temperature),
            "humidity" => Ok(DraftField::Humidity),
            "status" | "currentstatus" => Ok(DraftField::Status),
            _ => Err(DraftError::UnknownField(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadStrategy {
    /// `{id, station, currentGps, temperature, humidity}`
    #[default]
    Minimal,
    /// Full record with owner and an initial transport history entry.
    Full,
}

impl FromStr for PayloadStrategy {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minimal" => Ok(PayloadStrategy::Minimal),
            "full" => Ok(PayloadStrategy::Full),
            _ => Err(DraftError::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for PayloadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadStrategy::Minimal => write!(f, "minimal"),
            PayloadStrategy::Full => write!(f, "full"),
        }
    }
}

/// Form state for a plant that is about to be registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantDraft {
    pub code: String,
    pub station: String,
    pub location: String,
    pub current_gps: String,
    pub temperature: String,
    pub humidity: String,
    pub status: String,
    pub owner: Owner,
}

impl PlantDraft {
    pub fn new(code: impl Into<String>, owner: Owner) -> Self {
        Self {
            code: code.into(),
            station: String::new(),
            location: String::new(),
            current_gps: String::new(),
            temperature: String::new(),
            humidity: String::new(),
            status: String::new(),
            owner,
        }
    }

    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Station => &self.station,
            DraftField::Location => &self.location,
            DraftField::CurrentGps => &self.current_gps,
            DraftField::Temperature => &self.temperature,
            DraftField::Humidity => &self.humidity,
            DraftField::Status => &self.status,
        }
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Station => self.station = value,
            DraftField::Location => self.location = value,
            DraftField::CurrentGps => self.current_gps = value,
            DraftField::Temperature => self.temperature = value,
            DraftField::Humidity => self.humidity = value,
            DraftField::Status => self.status = value,
        }
    }

    /// Set a field by its form name (`origin`, `gps`, ... are accepted).
    pub fn set_named(&mut self, name: &str, value: impl Into<String>) -> Result<(), DraftError> {
        let field = name.parse::<DraftField>()?;
        self.set(field, value);
        Ok(())
    }

    /// Clear every edited field. The code and owner stay.
    pub fn clear(&mut self) {
        for field in DraftField::ALL {
            self.set(field, String::new());
        }
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        for field in DraftField::ALL {
            if field.is_required() && self.get(field).trim().is_empty() {
                return Err(DraftError::MissingField(field.label()));
            }
        }
        Ok(())
    }

    /// The transport entry recorded when the plant is first registered.
    pub fn initial_transport(&self, timestamp_ms: i64) -> TransportRecord {
        TransportRecord {
            timestamp: timestamp_ms,
            gps: self.current_gps.clone(),
            temperature: self.temperature.clone(),
            humidity: self.humidity.clone(),
            owner: self.owner.clone(),
        }
    }

    /// Validate the draft and build the create request body.
    pub fn to_payload(
        &self,
        strategy: PayloadStrategy,
        timestamp_ms: i64,
    ) -> Result<Value, DraftError> {
        self.validate()?;
        let payload = match strategy {
            PayloadStrategy::Minimal => json!({
                "id": self.code,
                "station": self.station,
                "currentGps": self.current_gps,
                "temperature": self.temperature,
                "humidity": self.humidity,
            }),
            PayloadStrategy::Full => json!({
                "qrCode": self.code,
                "creationTimestamp": timestamp_ms,
                "origin": self.station,
                "currentStatus": self.status,
                "temperature": self.temperature,
                "humidity": self.humidity,
                "currentGps": self.current_gps,
                "currentOwner": self.owner,
                "transportHistory": [self.initial_transport(timestamp_ms)],
                "location": self.location,
            }),
        };
        Ok(payload)
    }
}
