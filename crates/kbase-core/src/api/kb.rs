use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::KnowledgeBase;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateKnowledgeBaseRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser_config: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embd_id: Option<String>,
}

impl CreateKnowledgeBaseRequest {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parser_id: None,
            parser_config: None,
            embd_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateKnowledgeBaseRequest {
    pub kb_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagerank: Option<i64>,
}

/// Body of the delete call.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KnowledgeBaseIdRequest {
    pub kb_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListKnowledgeBasesRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_ids: Option<Vec<String>>,
}

/// Query string of the list call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListKnowledgeBasesQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orderby: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<bool>,
}

impl ListKnowledgeBasesQuery {
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        [
            self.keywords.clone().map(|value| ("keywords", value)),
            self.page.map(|value| ("page", value.to_string())),
            self.page_size.map(|value| ("page_size", value.to_string())),
            self.parser_id.clone().map(|value| ("parser_id", value)),
            self.orderby.clone().map(|value| ("orderby", value)),
            self.desc.map(|value| ("desc", value.to_string())),
        ]
        .into_iter()
        .flatten()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RemoveTagsRequest {
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RenameTagRequest {
    pub from_tag: String,
    pub to_tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseList {
    #[serde(default)]
    pub kbs: Vec<KnowledgeBase>,
    #[serde(default)]
    pub total: u64,
}

/// Create responses carry either `{kb_id}` or the full record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedKnowledgeBase {
    #[serde(default)]
    pub kb_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CreatedKnowledgeBase {
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.kb_id.as_deref().or(self.id.as_deref())
    }
}

/// Graph and mind map of a knowledge base; both are empty objects until
/// the server has built them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    #[serde(default)]
    pub graph: serde_json::Value,
    #[serde(default)]
    pub mind_map: serde_json::Value,
}

impl KnowledgeGraph {
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph
            .get("nodes")
            .and_then(serde_json::Value::as_array)
            .map_or(0, Vec::len)
    }
}
