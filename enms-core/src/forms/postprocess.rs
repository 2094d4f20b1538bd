use serde_json::{Map, Value};

use super::{FormRegistry, FormResult, PropertyType};

/// Key holding the form type of a submitted form.
pub const FORM_TYPE_KEY: &str = "form_type";

/// Submitted form fields, keeping repeated keys in submission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// First value submitted for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value submitted for `key`.
    pub fn get_all(&self, key: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn form_type(&self) -> Option<&str> {
        self.get(FORM_TYPE_KEY)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// File uploaded alongside a form.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub content: Vec<u8>,
}

/// Form data converted into typed values, ready for `factory`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedForm {
    pub data: Map<String, Value>,
    pub file: Option<UploadedFile>,
}

/// Convert submitted form data using the properties of its form type.
pub fn postprocess(
    registry: &FormRegistry,
    form: &FormData,
    user: &str,
    file: Option<UploadedFile>,
) -> FormResult<ProcessedForm> {
    let mut data = Map::new();
    for (key, value) in &form.pairs {
        if !data.contains_key(key) {
            data.insert(key.clone(), Value::String(value.clone()));
        }
    }
    data.insert("user".to_string(), Value::String(user.to_string()));

    let form_type = form.form_type().unwrap_or_default();
    for (property, property_type) in registry.properties(form_type) {
        if property_type.is_list() {
            let values = form.get_all(property).into_iter().map(Value::String).collect();
            data.insert(property.to_string(), Value::Array(values));
        } else if property_type == PropertyType::Bool {
            data.insert(property.to_string(), Value::Bool(form.contains(property)));
        } else if property_type.has_conversion() {
            if let Some(raw) = form.get(property) {
                let value = property_type.convert(property, raw)?;
                data.insert(property.to_string(), value);
            }
        }
    }

    Ok(ProcessedForm { data, file })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{FieldKind, FieldSpec, FormError, FormSchema};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registry() -> FormRegistry {
        FormRegistry::builder()
            .register(
                FormSchema::new("device")
                    .field(FieldSpec::new("name", FieldKind::String))
                    .field(FieldSpec::new("port", FieldKind::Integer))
                    .field(FieldSpec::new("enabled", FieldKind::Boolean))
                    .field(FieldSpec::new("pools", FieldKind::MultipleInstance))
                    .field(FieldSpec::new("tags", FieldKind::SelectMultiple)),
            )
            .build()
    }

    #[test]
    fn test_absent_bool_is_false() {
        let form: FormData = [("form_type", "device"), ("name", "r1")].into_iter().collect();
        let processed = postprocess(&registry(), &form, "admin", None).unwrap();
        assert_eq!(processed.data["enabled"], json!(false));
    }

    #[test]
    fn test_present_bool_is_true_whatever_the_value() {
        let form: FormData = [("form_type", "device"), ("enabled", "")].into_iter().collect();
        let processed = postprocess(&registry(), &form, "admin", None).unwrap();
        assert_eq!(processed.data["enabled"], json!(true));
    }

    #[test]
    fn test_list_properties_keep_every_value() {
        let form: FormData = [
            ("form_type", "device"),
            ("pools", "core"),
            ("pools", "edge"),
            ("tags", "lab"),
        ]
        .into_iter()
        .collect();
        let processed = postprocess(&registry(), &form, "admin", None).unwrap();
        assert_eq!(processed.data["pools"], json!(["core", "edge"]));
        assert_eq!(processed.data["tags"], json!(["lab"]));
    }

    #[test]
    fn test_missing_list_property_is_empty_list() {
        let form: FormData = [("form_type", "device")].into_iter().collect();
        let processed = postprocess(&registry(), &form, "admin", None).unwrap();
        assert_eq!(processed.data["pools"], json!([]));
        assert_eq!(processed.data["tags"], json!([]));
    }

    #[test]
    fn test_conversions_apply_only_to_present_keys() {
        let form: FormData = [("form_type", "device"), ("port", "830")].into_iter().collect();
        let processed = postprocess(&registry(), &form, "admin", None).unwrap();
        assert_eq!(processed.data["port"], json!(830));
        assert!(!processed.data.contains_key("name"));
        assert_eq!(processed.data["user"], json!("admin"));
        assert_eq!(processed.data["form_type"], json!("device"));
    }

    #[test]
    fn test_conversion_failure_is_reported() {
        let form: FormData = [("form_type", "device"), ("port", "ssh")].into_iter().collect();
        let err = postprocess(&registry(), &form, "admin", None).unwrap_err();
        assert!(matches!(err, FormError::Conversion { property, .. } if property == "port"));
    }

    #[test]
    fn test_unknown_form_type_passes_data_through() {
        let form: FormData = [("form_type", "other"), ("port", "ssh")].into_iter().collect();
        let processed = postprocess(&registry(), &form, "admin", None).unwrap();
        assert_eq!(processed.data["port"], json!("ssh"));
        assert!(!processed.data.contains_key("enabled"));
    }

    #[test]
    fn test_uploaded_file_is_attached() {
        let form: FormData = [("form_type", "device")].into_iter().collect();
        let file = UploadedFile {
            filename: Some("topology.json".to_string()),
            content: b"{}".to_vec(),
        };
        let processed = postprocess(&registry(), &form, "admin", Some(file.clone())).unwrap();
        assert_eq!(processed.file, Some(file));
    }
}
