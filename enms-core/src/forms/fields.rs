use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

use super::FormError;

/// Kind of a declared form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Password,
    Hidden,
    Integer,
    Float,
    Boolean,
    Select,
    SelectMultiple,
    Dict,
    Json,
    Instance,
    MultipleInstance,
    Submit,
    File,
}

impl FieldKind {
    /// Semantic type harvested for this kind of field.
    ///
    /// Kinds without a semantic type are not recorded as properties.
    pub fn property_type(self) -> Option<PropertyType> {
        match self {
            Self::String | Self::Password | Self::Select => Some(PropertyType::Str),
            Self::Integer => Some(PropertyType::Integer),
            Self::Float => Some(PropertyType::Float),
            Self::Boolean => Some(PropertyType::Bool),
            Self::SelectMultiple => Some(PropertyType::Multiselect),
            Self::Dict => Some(PropertyType::Dict),
            Self::Json => Some(PropertyType::Json),
            Self::Instance => Some(PropertyType::Object),
            Self::MultipleInstance => Some(PropertyType::ObjectList),
            Self::Hidden | Self::Submit | Self::File => None,
        }
    }
}

/// Semantic type of a property, driving how submitted values are converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    Str,
    Integer,
    Float,
    Bool,
    Dict,
    Json,
    Object,
    ObjectList,
    Multiselect,
}

impl PropertyType {
    /// Whether every submitted value of the key is kept.
    pub fn is_list(self) -> bool {
        matches!(self, Self::ObjectList | Self::Multiselect)
    }

    /// Whether a named conversion exists for this type.
    pub fn has_conversion(self) -> bool {
        !self.is_list() && self != Self::Bool
    }

    /// Convert one raw submitted value.
    pub fn convert(self, property: &str, raw: &str) -> Result<Value, FormError> {
        let conversion_error = |message: String| FormError::Conversion {
            property: property.to_string(),
            property_type: self,
            message,
        };
        match self {
            Self::Str | Self::Object => Ok(Value::String(raw.to_string())),
            Self::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|e| conversion_error(e.to_string())),
            Self::Float => raw
                .trim()
                .parse::<f64>()
                .map(Value::from)
                .map_err(|e| conversion_error(e.to_string())),
            Self::Dict => match serde_json::from_str::<Value>(raw) {
                Ok(value @ Value::Object(_)) => Ok(value),
                Ok(other) => Err(conversion_error(format!("expected an object, got {}", other))),
                Err(e) => Err(conversion_error(e.to_string())),
            },
            Self::Json => serde_json::from_str(raw).map_err(|e| conversion_error(e.to_string())),
            Self::Bool | Self::ObjectList | Self::Multiselect => {
                Err(conversion_error("no conversion for this type".to_string()))
            }
        }
    }
}

/// A declared form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    /// Display label, recorded in the property names table.
    pub label: Option<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            label: None,
        }
    }

    pub fn labeled(name: impl Into<String>, kind: FieldKind, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            label: Some(label.into()),
        }
    }
}
