use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostKv2DataRequest {
    /// The contents of the data map will be stored and returned on read.
    pub data: Map<String, Value>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetKv2DataResponse {
    pub request_id: Option<String>,
    pub data: Option<Kv2Data>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kv2Data {
    /// Null when the latest version has been deleted or destroyed.
    pub data: Option<Map<String, Value>>,
    pub metadata: Option<Kv2VersionMetadata>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kv2VersionMetadata {
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub created_time: String,
    #[serde(default)]
    pub deletion_time: String,
    #[serde(default)]
    pub destroyed: bool,
}
