//! HTTP request → procedure input message.
//!
//! # Responsibilities
//! - Read and parse the JSON body for `body: *` routes
//! - Read query parameters for routes without a body
//! - Overlay path captures onto the message fields
//!
//! # Design Decisions
//! - An empty body means an empty message, not an error
//! - The body must be a JSON object; arrays and scalars are rejected
//! - Path captures win over body and query fields of the same name
//! - Query keys the message does not declare are dropped; unknown body fields
//!   are left for the typed decoder to reject
//! - Typed decoding happens later, in the route's invoker

use axum::body::Body;
use serde_json::{Map, Value};

use crate::error::GatewayError;
use crate::routing::BodyRule;

/// Assemble the JSON input message for a matched route.
///
/// `query_fields` lists the message fields that may be set from the query
/// string.
pub async fn build_message(
    rule: BodyRule,
    captures: &[(String, String)],
    query_fields: &[&str],
    query: Option<&str>,
    body: Body,
    max_body_bytes: usize,
) -> Result<Value, GatewayError> {
    let mut fields = match rule {
        BodyRule::Whole => read_body_object(body, max_body_bytes).await?,
        BodyRule::None => read_query(query.unwrap_or(""), query_fields)?,
    };

    for (field, value) in captures {
        fields.insert(field.clone(), Value::String(value.clone()));
    }

    Ok(Value::Object(fields))
}

async fn read_body_object(
    body: Body,
    max_body_bytes: usize,
) -> Result<Map<String, Value>, GatewayError> {
    let bytes = axum::body::to_bytes(body, max_body_bytes)
        .await
        .map_err(|e| GatewayError::invalid_argument(format!("failed to read request body: {}", e)))?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(&bytes).map_err(GatewayError::invalid_argument)? {
        Value::Object(fields) => Ok(fields),
        other => Err(GatewayError::invalid_argument(format!(
            "request body must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn read_query(query: &str, known: &[&str]) -> Result<Map<String, Value>, GatewayError> {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(query).map_err(GatewayError::invalid_argument)?;

    Ok(pairs
        .into_iter()
        .filter(|(key, _)| {
            let declared = known.contains(&key.as_str());
            if !declared {
                tracing::debug!(parameter = %key, "Dropping unknown query parameter");
            }
            declared
        })
        .map(|(key, value)| (key, Value::String(value)))
        .collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
