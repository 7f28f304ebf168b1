//! Entity schemas.
//!
//! A schema names the identifier field, the reserved key under which the
//! index of that entity kind lives, and the fields an entity may carry. One
//! record service is parameterized by one schema; adding an entity kind is a
//! configuration change, not new code.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{CodecError, CodecResult};

/// A declared entity field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name as it appears in the encoded record.
    pub name: String,
    /// Whether the field must be present and non-empty on create.
    #[serde(default)]
    pub required: bool,
}

impl FieldSpec {
    /// A field that must be supplied on create.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
        }
    }

    /// A field that may be absent until a later update sets it.
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
        }
    }
}

/// Shape of one entity kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    /// Short name used to select the schema (e.g. "user").
    pub name: String,
    /// Name of the identifier field. Always required, never updatable.
    pub identifier: String,
    /// Reserved key holding the ordered list of identifiers.
    pub index_key: String,
    /// Non-identifier fields. Listing the identifier here is allowed and
    /// ignored.
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl EntitySchema {
    /// Registered travellers.
    pub fn user() -> Self {
        Self {
            name: "user".into(),
            identifier: "userName".into(),
            index_key: "User".into(),
            fields: vec![
                FieldSpec::required("firstName"),
                FieldSpec::required("lastName"),
                FieldSpec::optional("travelDate"),
            ],
        }
    }

    /// Booked packages.
    pub fn consignment() -> Self {
        Self {
            name: "consignment".into(),
            identifier: "packageID".into(),
            index_key: "Consignment".into(),
            fields: vec![
                FieldSpec::required("packageType"),
                FieldSpec::required("bookedOn"),
                FieldSpec::required("from"),
                FieldSpec::required("to"),
                FieldSpec::optional("flightNumber"),
                FieldSpec::optional("date"),
            ],
        }
    }

    /// Check the schema definition itself.
    pub fn check(&self) -> CodecResult<()> {
        let invalid = |reason: &str| CodecError::InvalidSchema {
            schema: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(invalid("schema name must not be empty"));
        }
        if self.identifier.is_empty() {
            return Err(invalid("identifier field name must not be empty"));
        }
        if self.index_key.is_empty() {
            return Err(invalid("index key must not be empty"));
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(invalid("field names must not be empty"));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(CodecError::InvalidSchema {
                    schema: self.name.clone(),
                    reason: format!("field declared twice: {}", field.name),
                });
            }
        }
        Ok(())
    }

    /// Returns `true` if `name` is this schema's identifier field.
    pub fn is_identifier(&self, name: &str) -> bool {
        self.identifier == name
    }

    /// Look up a declared non-identifier field.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|f| f.name == name && !self.is_identifier(&f.name))
    }

    /// Returns `true` if the schema declares `name` (identifier included).
    pub fn declares(&self, name: &str) -> bool {
        self.is_identifier(name) || self.field(name).is_some()
    }

    /// Names of the fields required on create, identifier first.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.identifier.as_str()).chain(
            self.fields
                .iter()
                .filter(|f| f.required && !self.is_identifier(&f.name))
                .map(|f| f.name.as_str()),
        )
    }

    /// The entity's identifier value, if present.
    pub fn identifier_of<'a>(&self, entity: &'a Entity) -> Option<&'a str> {
        entity.get(&self.identifier)
    }

    /// Validate an identifier value used as a storage key.
    ///
    /// An identifier equal to the index key would overwrite the index.
    pub fn validate_identifier(&self, id: &str) -> CodecResult<()> {
        if id.trim().is_empty() {
            return Err(CodecError::validation(
                &self.name,
                format!("identifier field {} must not be empty", self.identifier),
            ));
        }
        if id == self.index_key {
            return Err(CodecError::validation(
                &self.name,
                format!("identifier {id:?} collides with the reserved index key"),
            ));
        }
        Ok(())
    }

    /// Validate an entity submitted for creation.
    ///
    /// Returns the identifier on success.
    pub fn validate_new<'a>(&self, entity: &'a Entity) -> CodecResult<&'a str> {
        let id = self.identifier_of(entity).ok_or_else(|| {
            CodecError::validation(
                &self.name,
                format!("missing identifier field {}", self.identifier),
            )
        })?;
        self.validate_identifier(id)?;

        for name in self.required_fields() {
            match entity.get(name) {
                None => {
                    return Err(CodecError::validation(
                        &self.name,
                        format!("missing required field {name}"),
                    ))
                }
                Some(value) if value.trim().is_empty() => {
                    return Err(CodecError::validation(
                        &self.name,
                        format!("required field {name} must not be empty"),
                    ))
                }
                Some(_) => {}
            }
        }

        if let Some(unknown) = entity.field_names().find(|name| !self.declares(name)) {
            return Err(CodecError::validation(
                &self.name,
                format!("unknown field {unknown}"),
            ));
        }
        Ok(id)
    }

    /// Validate a single-field update against the schema.
    ///
    /// The identifier is not an updatable field and fails here as unknown.
    /// Callers that report immutability separately check
    /// [`is_identifier`](Self::is_identifier) first.
    pub fn validate_update(&self, field: &str, value: &str) -> CodecResult<()> {
        let spec = self.field(field).ok_or_else(|| {
            CodecError::validation(&self.name, format!("unknown field {field}"))
        })?;
        if spec.required && value.trim().is_empty() {
            return Err(CodecError::validation(
                &self.name,
                format!("required field {field} must not be empty"),
            ));
        }
        Ok(())
    }
}
