use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

/// Options for a validation run.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct NadelValidationConfig {
    /// The service that only contributes types shared by other services. It is never validated
    /// on its own; every service using a shared type validates it against its own schema.
    pub shared_service_name: String,

    /// Batch size recorded for batch hydrations that do not declare `batchSize`.
    pub default_batch_size: u32,

    /// Reject object and interface types whose every field is `@hidden`.
    pub reject_all_hidden_types: bool,
}

impl Default for NadelValidationConfig {
    fn default() -> Self {
        Self {
            shared_service_name: "shared".to_owned(),
            default_batch_size: 200,
            reject_all_hidden_types: true,
        }
    }
}

impl NadelValidationConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config = NadelValidationConfig::from_json(r#"{ "default_batch_size": 50 }"#).unwrap();
        assert_eq!(
            config,
            NadelValidationConfig {
                default_batch_size: 50,
                ..Default::default()
            }
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(NadelValidationConfig::from_json(r#"{ "batch_size": 50 }"#).is_err());
    }

    #[test]
    fn schema_lists_every_option() {
        let schema = serde_json::to_value(schemars::schema_for!(NadelValidationConfig)).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        let mut keys: Vec<_> = properties.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "default_batch_size",
                "reject_all_hidden_types",
                "shared_service_name"
            ]
        );
    }
}
