use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::ret_code;

/// `{code, data?, message}` body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: i64,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: String,
}

impl<T> ApiEnvelope<T> {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == ret_code::SUCCESS
    }
}

impl ApiEnvelope<serde_json::Value> {
    /// Re-types `data`. Only successful envelopes are decoded; failures
    /// often carry `data: false` and keep `None`.
    pub fn decode_data<T: DeserializeOwned>(self) -> Result<ApiEnvelope<T>, serde_json::Error> {
        let data = match self.data {
            Some(value) if self.code == ret_code::SUCCESS && !value.is_null() => {
                Some(serde_json::from_value(value)?)
            }
            _ => None,
        };
        Ok(ApiEnvelope {
            code: self.code,
            data,
            message: self.message,
        })
    }
}
