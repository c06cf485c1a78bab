use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "applicationID")]
    pub application_id: i64,
    #[serde(default)]
    pub application_name: String,
}
