use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use crate::constants::{
    DEFAULT_HLS_ADDRESS, DEFAULT_HLS_PART_DURATION, DEFAULT_HLS_SEGMENT_DURATION,
    RTSP_TRANSPORT, SOURCE_ON_DEMAND, SOURCE_ON_DEMAND_CLOSE_AFTER,
};

/// Media relay routing file (mediamtx.yml)
///
/// Only `paths` is managed here. Every other top-level setting is carried
/// through untouched so hand edits to the relay config survive a rewrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(flatten)]
    pub settings: IndexMap<String, Value>,
    #[serde(default)]
    pub paths: IndexMap<String, PathEntry>,
}

/// One camera's routing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(
        rename = "rtspTransport",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub rtsp_transport: Option<String>,
    #[serde(
        rename = "sourceOnDemand",
        default,
        deserialize_with = "yaml11_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_on_demand: Option<bool>,
    #[serde(
        rename = "sourceOnDemandCloseAfter",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_on_demand_close_after: Option<String>,
    /// Relay options this API does not manage
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Accept YAML 1.1 spellings (`yes`, `off`, ...) that the relay also accepts
///
/// Hand-edited relay configs often use them, while serde_yaml only knows
/// `true`/`false`.
fn yaml11_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(flag)),
        Some(Value::String(text)) => match text.to_ascii_lowercase().as_str() {
            "yes" | "y" | "on" | "true" => Ok(Some(true)),
            "no" | "n" | "off" | "false" => Ok(Some(false)),
            _ => Err(de::Error::invalid_value(
                de::Unexpected::Str(&text),
                &"a boolean",
            )),
        },
        Some(other) => Err(de::Error::custom(format!(
            "expected a boolean, found {other:?}"
        ))),
    }
}

impl PathEntry {
    /// Entry for a camera pulled over RTSP/TCP only while someone is watching
    pub fn on_demand(source: &str) -> Self {
        Self {
            source: Some(source.to_string()),
            rtsp_transport: Some(RTSP_TRANSPORT.to_string()),
            source_on_demand: Some(SOURCE_ON_DEMAND),
            source_on_demand_close_after: Some(SOURCE_ON_DEMAND_CLOSE_AFTER.to_string()),
            extra: IndexMap::new(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        let mut settings = IndexMap::new();
        settings.insert("hlsAddress".to_string(), DEFAULT_HLS_ADDRESS.into());
        settings.insert(
            "hlsPartDuration".to_string(),
            DEFAULT_HLS_PART_DURATION.into(),
        );
        settings.insert(
            "hlsSegmentDuration".to_string(),
            DEFAULT_HLS_SEGMENT_DURATION.into(),
        );

        Self {
            settings,
            paths: IndexMap::new(),
        }
    }
}

impl RoutingConfig {
    pub fn contains(&self, name: &str) -> bool {
        self.paths.contains_key(name)
    }

    /// Source URL of a camera, or "" when the camera has no entry
    pub fn source_url(&self, name: &str) -> &str {
        self.paths
            .get(name)
            .and_then(|entry| entry.source.as_deref())
            .unwrap_or("")
    }

    /// Insert or replace a camera's entry
    pub fn upsert_camera(&mut self, name: &str, source: &str) {
        self.paths
            .insert(name.to_string(), PathEntry::on_demand(source));
    }

    /// Returns true if an entry was removed
    pub fn remove_camera(&mut self, name: &str) -> bool {
        self.paths.shift_remove(name).is_some()
    }

    /// Move an entry to a new key, keeping its position in the file
    ///
    /// Returns false if `old` has no entry.
    pub fn rename_camera(&mut self, old: &str, new: &str) -> bool {
        match self.paths.shift_remove_full(old) {
            Some((index, _, entry)) => {
                self.paths.shift_insert(index, new.to_string(), entry);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_routing_settings() {
        let config = RoutingConfig::default();
        assert_eq!(
            config.settings.get("hlsAddress"),
            Some(&Value::from(":8888"))
        );
        assert!(config.paths.is_empty());
    }

    #[test]
    fn test_upsert_overwrites_existing_camera() {
        let mut config = RoutingConfig::default();
        config.upsert_camera("gate", "rtsp://10.0.0.1/stream");
        config.upsert_camera("gate", "rtsp://10.0.0.2/stream");

        assert_eq!(config.paths.len(), 1);
        assert_eq!(config.source_url("gate"), "rtsp://10.0.0.2/stream");

        let entry = &config.paths["gate"];
        assert_eq!(entry.rtsp_transport.as_deref(), Some("tcp"));
        assert_eq!(entry.source_on_demand, Some(true));
        assert_eq!(entry.source_on_demand_close_after.as_deref(), Some("10s"));
    }

    #[test]
    fn test_source_url_defaults_to_empty() {
        let config = RoutingConfig::default();
        assert_eq!(config.source_url("missing"), "");
    }

    #[test]
    fn test_rename_keeps_position() {
        let mut config = RoutingConfig::default();
        config.upsert_camera("a", "rtsp://a");
        config.upsert_camera("b", "rtsp://b");
        config.upsert_camera("c", "rtsp://c");

        assert!(config.rename_camera("b", "hall"));
        let names: Vec<&str> = config.paths.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["a", "hall", "c"]);
        assert_eq!(config.source_url("hall"), "rtsp://b");

        assert!(!config.rename_camera("missing", "other"));
    }

    #[test]
    fn test_unmanaged_keys_survive_round_trip() {
        let yaml = r#"
logLevel: info
hlsAddress: ":9999"
paths:
  gate:
    source: rtsp://10.0.0.1/stream
    rtspTransport: tcp
    record: yes
"#;
        let config: RoutingConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.source_url("gate"), "rtsp://10.0.0.1/stream");
        assert!(config.paths["gate"].extra.contains_key("record"));

        let written = serde_yaml::to_string(&config).unwrap();
        assert!(written.contains("logLevel: info"));
        assert!(written.contains("record:"));

        let reparsed: RoutingConfig = serde_yaml::from_str(&written).unwrap();
        assert_eq!(reparsed, config);
    }

    #[test]
    fn test_yaml11_booleans_are_accepted() {
        let yaml = r#"
paths:
  cam0:
    source: rtsp://10.0.0.9/stream
    sourceOnDemand: yes
  cam1:
    source: rtsp://10.0.0.10/stream
    sourceOnDemand: Off
"#;
        let mut config: RoutingConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.paths["cam0"].source_on_demand, Some(true));
        assert_eq!(config.paths["cam1"].source_on_demand, Some(false));

        config.upsert_camera("cam2", "rtsp://10.0.0.11/stream");
        let written = serde_yaml::to_string(&config).unwrap();
        let reparsed: RoutingConfig = serde_yaml::from_str(&written).unwrap();
        assert_eq!(reparsed.paths["cam0"].source_on_demand, Some(true));
        assert_eq!(reparsed.source_url("cam2"), "rtsp://10.0.0.11/stream");
    }

    #[test]
    fn test_non_boolean_on_demand_is_rejected() {
        let yaml = "paths:\n  cam0:\n    sourceOnDemand: sometimes\n";
        assert!(serde_yaml::from_str::<RoutingConfig>(yaml).is_err());
    }
}
