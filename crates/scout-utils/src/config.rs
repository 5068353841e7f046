//! Configuration file helpers
//!
//! Config files are JSON. String values may reference environment variables
//! with `${VAR}`. Only the braced form is recognised because bare `$XYZ` is
//! how tickers are written in this domain.

use crate::error::{Result, UtilsError};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;
use std::sync::LazyLock;

static ENV_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env reference pattern is valid")
});

/// Resolve `${VAR}` references in a string
///
/// # Example
///
/// ```
/// # use scout_utils::resolve_env_string;
/// // SAFETY: single-threaded doctest
/// unsafe { std::env::set_var("SCOUT_DOC_VAR", "value") };
/// let result = resolve_env_string("prefix_${SCOUT_DOC_VAR}_suffix")?;
/// assert_eq!(result, "prefix_value_suffix");
/// # Ok::<(), scout_utils::UtilsError>(())
/// ```
pub fn resolve_env_string(s: &str) -> Result<String> {
    let mut result = s.to_string();

    for cap in ENV_REF.captures_iter(s) {
        let var_name = &cap[1];
        let value =
            std::env::var(var_name).map_err(|_| UtilsError::EnvVarNotFound(var_name.to_string()))?;
        result = result.replace(&cap[0], &value);
    }

    Ok(result)
}

/// Resolve `${VAR}` references in every string of a JSON document
///
/// A string that is exactly one reference to an unset variable becomes
/// `null`, so optional credentials simply end up absent. A missing variable
/// embedded in a longer string is an error.
pub fn resolve_env_value(value: &mut Value) -> Result<()> {
    match value {
        Value::String(s) => {
            let unset_whole_value = ENV_REF
                .captures(s)
                .is_some_and(|cap| cap[0].len() == s.len() && std::env::var(&cap[1]).is_err());
            if unset_whole_value {
                *value = Value::Null;
            } else {
                *s = resolve_env_string(s)?;
            }
        }
        Value::Array(items) => {
            for item in items {
                resolve_env_value(item)?;
            }
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                resolve_env_value(item)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Read a JSON file, interpolate environment references and deserialize it
pub fn load_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let mut value: Value = serde_json::from_str(&content)?;
    resolve_env_value(&mut value)?;
    Ok(serde_json::from_value(value)?)
}
