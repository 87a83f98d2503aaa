//! Response classification
//!
//! Turns a completed HTTP exchange (status + body text) into either the
//! caller's target shape or a [`SpaceTradersError`]. Order of checks:
//!
//! 1. `429` is a rate limit; the body is not looked at.
//! 2. A generic error envelope anywhere in the body wins over a successful
//!    decode of the target shape.
//! 3. Any other non-2xx status is a domain error carrying the status code.
//! 4. The body is decoded into the target shape; in strict mode keys the
//!    shape does not know about are rejected.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use spacetraders_domain::{ApiError, Result, SpaceTradersError};

/// Classify a response body for the target shape `T`.
pub fn classify<T>(status: StatusCode, body: &str, strict: bool) -> Result<T>
where
    T: DeserializeOwned + Serialize,
{
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(SpaceTradersError::RateLimited(ApiError::rate_limited()));
    }

    let code = u32::from(status.as_u16());
    let raw = if body.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str::<Value>(body) {
            Ok(raw) => raw,
            Err(_) if !status.is_success() => {
                return Err(SpaceTradersError::Domain(ApiError::new(
                    "error",
                    body.trim(),
                    code,
                )));
            }
            Err(err) => {
                return Err(SpaceTradersError::Decode(format!("response is not JSON: {err}")));
            }
        }
    };

    if let Some(mut err) = error_envelope(&raw) {
        if err.code == 0 && !status.is_success() {
            err.code = code;
        }
        return Err(SpaceTradersError::Domain(err));
    }

    if !status.is_success() {
        let reason = status.canonical_reason().unwrap_or("unexpected status");
        return Err(SpaceTradersError::Domain(ApiError::new("error", reason, code)));
    }

    let value: T = serde_json::from_value(raw.clone())
        .map_err(|err| SpaceTradersError::Decode(err.to_string()))?;

    if strict {
        let known = serde_json::to_value(&value)
            .map_err(|err| SpaceTradersError::Decode(err.to_string()))?;
        if let Some(path) = first_unknown_key(&raw, &known, "$") {
            return Err(SpaceTradersError::Decode(format!("unknown field `{path}`")));
        }
    }

    Ok(value)
}

/// Detect the generic error envelope.
///
/// Two shapes are recognised:
/// - nested: `{"error": {"message": "...", "code": 400}}`, labelled `"error"`
/// - flat: `{"error": "label", "message": "...", "code": 400}`
pub fn error_envelope(raw: &Value) -> Option<ApiError> {
    let object = raw.as_object()?;
    match object.get("error")? {
        Value::Object(nested) => {
            let message = string_field(nested, "message");
            if message.is_empty() {
                return None;
            }
            Some(ApiError::new("error", message, code_field(nested)))
        }
        Value::String(kind) => {
            let message = string_field(object, "message");
            if kind.is_empty() && message.is_empty() {
                return None;
            }
            Some(ApiError::new(kind.as_str(), message, code_field(object)))
        }
        _ => None,
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> String {
    object.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn code_field(object: &Map<String, Value>) -> u32 {
    let Some(code) = object.get("code") else {
        return 0;
    };
    code.as_u64()
        .or_else(|| code.as_f64().filter(|c| c.is_finite() && *c >= 0.0).map(|c| c as u64))
        .and_then(|c| u32::try_from(c).ok())
        .unwrap_or(0)
}

/// First object key present in `raw` but absent from `known`, as a JSON
/// path such as `$.user.ships[0].extra`.
fn first_unknown_key(raw: &Value, known: &Value, path: &str) -> Option<String> {
    match (raw, known) {
        (Value::Object(raw), Value::Object(known)) => raw.iter().find_map(|(key, value)| {
            let child = format!("{path}.{key}");
            match known.get(key) {
                Some(known_value) => first_unknown_key(value, known_value, &child),
                None => Some(child),
            }
        }),
        (Value::Array(raw), Value::Array(known)) => {
            raw.iter().zip(known).enumerate().find_map(|(index, (value, known_value))| {
                first_unknown_key(value, known_value, &format!("{path}[{index}]"))
            })
        }
        (Value::Object(raw), _) => raw.keys().next().map(|key| format!("{path}.{key}")),
        _ => None,
    }
}
