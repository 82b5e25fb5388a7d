//! Page-supplied option strings.
//!
//! A page that passes malformed options still gets a backdrop: the parse
//! error is logged at `warn` and the defaults are used instead.

use serde::de::DeserializeOwned;
use strandfx_core::{FieldConfig, FieldError, FormFields, StarfieldConfig};

/// Parse `json` into `T`, treating a missing or blank string as `{}`.
///
/// # Errors
///
/// [`FieldError::InvalidConfig`] when the string is not valid JSON for `T`.
pub fn parse_options<T: DeserializeOwned + Default>(json: Option<&str>) -> Result<T, FieldError> {
    match json.map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(text) => Ok(serde_json::from_str(text)?),
    }
}

fn or_defaults<T: DeserializeOwned + Default>(json: Option<&str>, effect: &'static str) -> T {
    parse_options(json).unwrap_or_else(|err| {
        tracing::warn!(effect, error = %err, "ignoring backdrop options; using defaults");
        T::default()
    })
}

#[must_use]
pub fn field_options(json: Option<&str>) -> FieldConfig {
    or_defaults(json, "floating-lines")
}

#[must_use]
pub fn starfield_options(json: Option<&str>) -> StarfieldConfig {
    or_defaults(json, "hyperspace")
}

/// Parse a flat `{"name": "value", ...}` form payload. Non-string values
/// are kept in their JSON text form.
///
/// # Errors
///
/// [`FieldError::InvalidConfig`] when the payload is not a JSON object.
pub fn form_fields(json: &str) -> Result<FormFields, FieldError> {
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
    Ok(map
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, text)
        })
        .collect())
}

/// Turn a `Math.random()` sample in `[0, 1)` into a generator seed.
#[must_use]
pub fn seed_from_unit(sample: f64) -> u64 {
    const SCALE: f64 = (1u64 << 53) as f64;
    (sample.clamp(0.0, 1.0) * SCALE) as u64
}
