use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::core::utils::timestamp_opt;

use super::application::Application;

pub const UNKNOWN_APPLICATION: &str = "Unknown";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "AccessPayload")]
pub struct Access {
    #[serde(rename = "accessID")]
    pub access_id: i64,
    pub application_name: String,
    #[serde(with = "timestamp_opt")]
    pub date_granted: Option<DateTime<FixedOffset>>,
}

// Servers send the application name either flat or nested under `application`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessPayload {
    #[serde(rename = "accessID")]
    access_id: i64,
    #[serde(default)]
    application_name: Option<String>,
    #[serde(default)]
    application: Option<Application>,
    #[serde(default, with = "timestamp_opt")]
    date_granted: Option<DateTime<FixedOffset>>,
}

impl From<AccessPayload> for Access {
    fn from(payload: AccessPayload) -> Self {
        let application_name = payload
            .application_name
            .filter(|x| !x.is_empty())
            .or(payload.application.map(|x| x.application_name))
            .filter(|x| !x.is_empty())
            .unwrap_or_else(|| UNKNOWN_APPLICATION.to_string());
        Access {
            access_id: payload.access_id,
            application_name,
            date_granted: payload.date_granted,
        }
    }
}
