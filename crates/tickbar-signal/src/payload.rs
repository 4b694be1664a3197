//! Signal request and response bodies.

use serde::{Deserialize, Serialize};

/// Body posted to the signal endpoint for one closed bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalRequest {
    /// Instrument identifier.
    pub symbol: String,
    /// Recent closes, oldest first, ending with the bar that just closed.
    pub closes: Vec<f64>,
    /// Reference price for sizing (the closed bar's close).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Ask the endpoint not to place real orders.
    pub dry_run: bool,
}

/// Endpoint reply. Every field is optional since the endpoint answers
/// differently for holds, orders and rejections.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalResponse {
    /// Outcome label, e.g. `HOLD`.
    #[serde(default)]
    pub result: Option<String>,
    /// Identifier of the recorded decision.
    #[serde(default, deserialize_with = "lenient_id")]
    pub decision_id: Option<String>,
    /// Error message for rejected requests.
    #[serde(default)]
    pub error: Option<String>,
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
