use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use consign_codec::EntitySchema;
use consign_kv::KvStore;
use serde::{Deserialize, Serialize};

use crate::error::{RecordError, RecordResult};
use crate::service::RecordService;

/// Configuration for the record layer: which entity kinds exist.
///
/// Loaded from TOML:
///
/// ```toml
/// default_schema = "consignment"
///
/// [[schemas]]
/// name = "consignment"
/// identifier = "packageID"
/// index_key = "Consignment"
/// fields = [
///     { name = "packageType", required = true },
///     { name = "flightNumber" },
/// ]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordsConfig {
    /// Schema used when the caller does not name one.
    pub default_schema: String,
    /// Every configured entity kind.
    pub schemas: Vec<EntitySchema>,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            default_schema: "consignment".into(),
            schemas: vec![EntitySchema::user(), EntitySchema::consignment()],
        }
    }
}

impl RecordsConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> RecordResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| RecordError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> RecordResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| RecordError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Check every schema and the cross-schema constraints.
    ///
    /// Schemas share one keyspace, so names and index keys must be unique.
    pub fn validate(&self) -> RecordResult<()> {
        let mut names = HashSet::new();
        let mut index_keys = HashSet::new();
        for schema in &self.schemas {
            schema.check()?;
            if !names.insert(schema.name.as_str()) {
                return Err(RecordError::Config(format!(
                    "schema defined twice: {}",
                    schema.name
                )));
            }
            if !index_keys.insert(schema.index_key.as_str()) {
                return Err(RecordError::Config(format!(
                    "index key shared by more than one schema: {}",
                    schema.index_key
                )));
            }
        }
        self.schema(&self.default_schema)?;
        Ok(())
    }

    /// Look up a schema by name.
    pub fn schema(&self, name: &str) -> RecordResult<&EntitySchema> {
        self.schemas
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| RecordError::Config(format!("unknown schema: {name}")))
    }

    /// Build a service for the named schema, or the default when `None`.
    pub fn service(
        &self,
        name: Option<&str>,
        store: Arc<dyn KvStore>,
    ) -> RecordResult<RecordService> {
        let schema = self.schema(name.unwrap_or(&self.default_schema))?;
        let reserved = self.schemas.iter().map(|s| s.index_key.clone());
        Ok(RecordService::new(store, schema.clone())?.with_reserved_keys(reserved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consign_kv::InMemoryKvStore;

    const SAMPLE: &str = r#"
default_schema = "crate"

[[schemas]]
name = "crate"
identifier = "crateID"
index_key = "Crates"
fields = [
    { name = "weight", required = true },
    { name = "note" },
]
"#;

    #[test]
    fn default_config_has_presets() {
        let config = RecordsConfig::default();
        config.validate().unwrap();
        assert_eq!(config.schema("user").unwrap().identifier, "userName");
        assert_eq!(config.schema("consignment").unwrap().identifier, "packageID");
    }

    #[test]
    fn parses_toml() {
        let config = RecordsConfig::from_toml_str(SAMPLE).unwrap();
        let schema = config.schema("crate").unwrap();
        assert_eq!(schema.index_key, "Crates");
        assert!(schema.field("weight").unwrap().required);
        assert!(!schema.field("note").unwrap().required);
    }

    #[test]
    fn rejects_unknown_default_schema() {
        let text = SAMPLE.replace("default_schema = \"crate\"", "default_schema = \"box\"");
        let err = RecordsConfig::from_toml_str(&text).unwrap_err();
        assert!(matches!(err, RecordError::Config(ref msg) if msg.contains("box")));
    }

    #[test]
    fn rejects_shared_index_key() {
        let mut config = RecordsConfig::default();
        config.schemas[1].index_key = config.schemas[0].index_key.clone();
        assert!(matches!(config.validate(), Err(RecordError::Config(_))));
    }

    #[test]
    fn rejects_duplicate_schema_names() {
        let mut config = RecordsConfig::default();
        config.schemas.push(EntitySchema {
            index_key: "Users2".into(),
            ..EntitySchema::user()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            RecordsConfig::from_toml_str("schemas = 3"),
            Err(RecordError::Config(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("consign.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        let config = RecordsConfig::load(&path).unwrap();
        assert_eq!(config.default_schema, "crate");
        assert!(RecordsConfig::load(dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn service_uses_default_schema() {
        let config = RecordsConfig::default();
        let store = Arc::new(InMemoryKvStore::new());
        let service = config.service(None, store.clone()).unwrap();
        assert_eq!(service.schema().name, "consignment");
        let users = config.service(Some("user"), store).unwrap();
        assert_eq!(users.schema().name, "user");
        assert!(matches!(
            users.get_one("Consignment"),
            Err(RecordError::NotFound { .. })
        ));
    }
}
