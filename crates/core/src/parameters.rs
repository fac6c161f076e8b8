//! Repository construction from a string-keyed parameter map.
//!
//! Deployments that configure the client through a flat map (environment,
//! service descriptors, JSON files) use the keys in
//! [`jcr_protocol::options::parameters`]. Unknown keys are ignored so the same
//! map can carry transport settings.

use crate::Repository;
use jcr_protocol::RepositoryOptions;
use jcr_protocol::options::parameters;
use jcr_runtime::{Error, Result, Transport};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Builds [`RepositoryOptions`] from `params`, starting from the defaults.
///
/// Flags accept JSON booleans or the strings `"true"`, `"false"`, `"1"` and
/// `"0"`.
pub fn options_from_parameters(params: &Map<String, Value>) -> Result<RepositoryOptions> {
    let mut options = RepositoryOptions::default();

    if let Some(disabled) = flag(params, parameters::DISABLE_TRANSACTIONS)? {
        options.transactions = !disabled;
    }
    if let Some(disabled) = flag(params, parameters::DISABLE_STREAM_WRAPPER)? {
        options.stream_wrapper = !disabled;
    }
    if let Some(enabled) = flag(params, parameters::AUTO_LASTMODIFIED)? {
        options.auto_lastmodified = enabled;
    }

    Ok(options)
}

fn flag(params: &Map<String, Value>, key: &str) -> Result<Option<bool>> {
    let Some(value) = params.get(key) else {
        return Ok(None);
    };

    match value {
        Value::Bool(b) => Ok(Some(*b)),
        Value::String(s) => match s.as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(Error::InvalidArgument(format!(
                "{} must be a boolean, got {:?}",
                key, s
            ))),
        },
        other => Err(Error::InvalidArgument(format!(
            "{} must be a boolean, got {}",
            key, other
        ))),
    }
}

impl Repository {
    /// Creates a repository over `transport` configured from `params`.
    ///
    /// See [`options_from_parameters`] for the recognised keys.
    pub fn from_parameters(
        transport: Arc<dyn Transport>,
        params: &Map<String, Value>,
    ) -> Result<Self> {
        let options = options_from_parameters(params)?;
        Ok(Self::builder().transport(transport).options(options).build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_empty_map_gives_defaults() {
        let options = options_from_parameters(&Map::new()).unwrap();
        assert_eq!(options, RepositoryOptions::default());
    }

    #[test]
    fn test_flags() {
        let options = options_from_parameters(&params(json!({
            "jcr.disable_transactions": true,
            "jcr.disable_stream_wrapper": "1",
            "jcr.auto_lastmodified": "false",
            "webdav.url": "http://localhost:8080/server/",
        })))
        .unwrap();

        assert!(!options.transactions);
        assert!(!options.stream_wrapper);
        assert!(!options.auto_lastmodified);
    }

    #[test]
    fn test_invalid_flag() {
        let err = options_from_parameters(&params(json!({
            "jcr.disable_transactions": "yes",
        })))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = options_from_parameters(&params(json!({
            "jcr.auto_lastmodified": 1,
        })))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
