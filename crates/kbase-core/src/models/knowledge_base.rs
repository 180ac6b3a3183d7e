use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const STATUS_VALID: &str = "1";

/// Client-side snapshot of a knowledge base. The server owns the record;
/// unknown fields are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub doc_num: i64,
    #[serde(default)]
    pub chunk_num: i64,
    #[serde(default)]
    pub token_num: i64,
    #[serde(default)]
    pub create_time: Option<i64>,
    #[serde(default)]
    pub update_time: Option<i64>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub parser_id: Option<String>,
    #[serde(default)]
    pub permission: Option<String>,
    #[serde(default)]
    pub pagerank: Option<i64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl KnowledgeBase {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.status.as_deref().map_or(true, |status| status == STATUS_VALID)
    }
}
