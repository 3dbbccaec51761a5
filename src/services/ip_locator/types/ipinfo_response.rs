use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct IpInfoResponse {
    pub ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// `"lat,lng"`; absent for bogon and anycast addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<String>,
}
