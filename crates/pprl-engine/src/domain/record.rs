//! Sensitive fields and provider records
//!
//! Raw field values are secret. They are only ever read by the normalizer
//! and never appear in `Debug` output or logs.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// How a field is normalized before hashing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Exact,
    Fuzzy,
    Phonetic,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Exact => "exact",
            FieldKind::Fuzzy => "fuzzy",
            FieldKind::Phonetic => "phonetic",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(FieldKind::Exact),
            "fuzzy" => Ok(FieldKind::Fuzzy),
            "phonetic" => Ok(FieldKind::Phonetic),
            other => Err(ValidationError::UnknownFieldType(other.to_string())),
        }
    }
}

/// A raw field value tagged with its normalization
#[derive(Clone, PartialEq, Eq)]
pub enum FieldValue {
    Exact(String),
    Fuzzy(String),
    Phonetic(String),
}

impl FieldValue {
    pub fn new(kind: FieldKind, value: impl Into<String>) -> Self {
        let value = value.into();
        match kind {
            FieldKind::Exact => FieldValue::Exact(value),
            FieldKind::Fuzzy => FieldValue::Fuzzy(value),
            FieldKind::Phonetic => FieldValue::Phonetic(value),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Exact(_) => FieldKind::Exact,
            FieldValue::Fuzzy(_) => FieldKind::Fuzzy,
            FieldValue::Phonetic(_) => FieldKind::Phonetic,
        }
    }

    /// The unnormalized secret value
    pub fn raw(&self) -> &str {
        match self {
            FieldValue::Exact(v) | FieldValue::Fuzzy(v) | FieldValue::Phonetic(v) => v,
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(<redacted>)", self.kind())
    }
}

/// A named secret attribute of a person
///
/// Wire shape: `{"name": ..., "value": ..., "type": "exact" | "fuzzy" | "phonetic"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSensitiveField", into = "RawSensitiveField")]
pub struct SensitiveField {
    pub name: String,
    pub value: FieldValue,
}

impl SensitiveField {
    pub fn new(name: impl Into<String>, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn exact(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, FieldValue::Exact(value.into()))
    }

    pub fn fuzzy(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, FieldValue::Fuzzy(value.into()))
    }

    pub fn phonetic(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, FieldValue::Phonetic(value.into()))
    }

    /// Build a field from an untyped `type` string
    pub fn parse(
        name: impl Into<String>,
        value: impl Into<String>,
        field_type: &str,
    ) -> Result<Self, ValidationError> {
        let kind = field_type.parse::<FieldKind>()?;
        Ok(Self::new(name, FieldValue::new(kind, value)))
    }

    pub fn kind(&self) -> FieldKind {
        self.value.kind()
    }
}

/// Untyped wire form of [`SensitiveField`]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawSensitiveField {
    pub name: String,
    pub value: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

impl TryFrom<RawSensitiveField> for SensitiveField {
    type Error = ValidationError;

    fn try_from(raw: RawSensitiveField) -> Result<Self, Self::Error> {
        SensitiveField::parse(raw.name, raw.value, &raw.field_type)
    }
}

impl From<SensitiveField> for RawSensitiveField {
    fn from(field: SensitiveField) -> Self {
        let field_type = field.kind().as_str().to_string();
        let value = match field.value {
            FieldValue::Exact(v) | FieldValue::Fuzzy(v) | FieldValue::Phonetic(v) => v,
        };
        Self {
            name: field.name,
            value,
            field_type,
        }
    }
}

/// A provider's record of one person, keyed by field name
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataProviderRecord {
    pub id: String,
    pub provider_id: String,
    pub fields: BTreeMap<String, SensitiveField>,
    pub created_at: DateTime<Utc>,
}

impl DataProviderRecord {
    pub fn new(id: impl Into<String>, provider_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            provider_id: provider_id.into(),
            fields: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Add a field under its own name
    pub fn with_field(mut self, field: SensitiveField) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }
}
