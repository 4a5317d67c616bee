use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectResponse {
    pub account: String,
    pub job_creator_address: String,
    pub token_address: Option<String>,
    pub required_deposit: Option<String>,
    pub controller_address: Option<String>,
    pub ready: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveResponse {
    pub controller_address: String,
    pub tx_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunJobRequest {
    pub message: String,
    #[serde(default)]
    pub module: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunJobResponse {
    pub tx_hash: String,
    pub job_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub account: Option<String>,
    pub job_creator_address: Option<String>,
    pub token_address: Option<String>,
    pub required_deposit: Option<String>,
    pub controller_address: Option<String>,
    pub ready: bool,
}
