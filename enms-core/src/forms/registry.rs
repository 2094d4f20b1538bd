use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::fields::{FieldSpec, PropertyType};

/// Form type whose direct children record their own fields as service fields.
pub const SERVICE_FORM_TYPE: &str = "service";

/// Default template used when a form does not name one.
pub const DEFAULT_TEMPLATE: &str = "base";

/// Declaration of one form type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    pub form_type: String,
    pub template: Option<String>,
    pub action: Option<String>,
    pub fields: Vec<FieldSpec>,
    /// Form types this form inherits from, in declaration order.
    pub bases: Vec<String>,
    pub abstract_service: bool,
}

impl FormSchema {
    pub fn new(form_type: impl Into<String>) -> Self {
        Self {
            form_type: form_type.into(),
            template: None,
            action: None,
            fields: Vec::new(),
            bases: Vec::new(),
            abstract_service: false,
        }
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn inherits(mut self, base: impl Into<String>) -> Self {
        self.bases.push(base.into());
        self
    }

    pub fn abstract_service(mut self) -> Self {
        self.abstract_service = true;
        self
    }
}

/// A related model exposed as a form property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Property name on the form, e.g. `devices`.
    pub property: String,
    /// Related model class, e.g. `Device`.
    pub model: String,
    /// Whether the relation holds many instances.
    pub list: bool,
}

/// Registered form type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormEntry {
    pub schema: FormSchema,
    pub template: String,
    pub action: Option<String>,
    /// Own and inherited properties of the form type.
    pub properties: BTreeMap<String, PropertyType>,
    pub service_fields: Vec<String>,
}

/// Builder collecting form declarations at startup.
#[derive(Debug, Default)]
pub struct FormRegistryBuilder {
    forms: HashMap<String, FormEntry>,
    property_types: BTreeMap<String, PropertyType>,
    property_names: BTreeMap<String, String>,
}

impl FormRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a form type.
    ///
    /// A second registration under the same form type replaces the first one,
    /// but properties accumulated for the form type are kept.
    pub fn register(mut self, schema: FormSchema) -> Self {
        let form_type = schema.form_type.clone();
        let properties: Vec<(String, PropertyType)> = schema
            .fields
            .iter()
            .filter_map(|field| {
                field
                    .kind
                    .property_type()
                    .map(|property_type| (field.name.clone(), property_type))
            })
            .collect();

        for field in &schema.fields {
            if let Some(label) = &field.label {
                self.property_names.insert(field.name.clone(), label.clone());
            }
        }
        self.property_types.extend(properties.iter().cloned());

        let mut form_properties = self
            .forms
            .remove(&form_type)
            .map(|entry| entry.properties)
            .unwrap_or_default();
        form_properties.extend(properties.iter().cloned());

        let mut service_fields = Vec::new();
        for base in &schema.bases {
            let Some(base_entry) = self.forms.get(base) else {
                debug!(form_type = %form_type, base = %base, "skipping unregistered base form");
                continue;
            };
            if base == SERVICE_FORM_TYPE {
                service_fields = properties.iter().map(|(name, _)| name.clone()).collect();
            }
            if base_entry.schema.abstract_service {
                service_fields.extend(base_entry.properties.keys().cloned());
            }
            form_properties.extend(
                base_entry
                    .properties
                    .iter()
                    .map(|(name, property_type)| (name.clone(), *property_type)),
            );
        }

        debug!(
            form_type = %form_type,
            properties = form_properties.len(),
            "registered form"
        );
        let entry = FormEntry {
            template: schema
                .template
                .clone()
                .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
            action: schema.action.clone(),
            properties: form_properties,
            service_fields,
            schema,
        };
        self.forms.insert(form_type, entry);
        self
    }

    /// Expose related models of a form type as object properties.
    pub fn configure_relationships(mut self, form_type: &str, relations: &[Relation]) -> Self {
        let Some(entry) = self.forms.get_mut(form_type) else {
            debug!(form_type = %form_type, "no form registered for relationships");
            return self;
        };
        for relation in relations {
            let property_type = if relation.list {
                PropertyType::ObjectList
            } else {
                PropertyType::Object
            };
            entry
                .properties
                .insert(relation.property.clone(), property_type);
            self.property_types
                .insert(relation.property.clone(), property_type);
        }
        self
    }

    pub fn build(self) -> FormRegistry {
        FormRegistry {
            forms: self.forms,
            property_types: self.property_types,
            property_names: self.property_names,
        }
    }
}

/// Immutable lookup of every registered form type.
#[derive(Debug, Clone, Default)]
pub struct FormRegistry {
    forms: HashMap<String, FormEntry>,
    property_types: BTreeMap<String, PropertyType>,
    property_names: BTreeMap<String, String>,
}

impl FormRegistry {
    pub fn builder() -> FormRegistryBuilder {
        FormRegistryBuilder::new()
    }

    pub fn form(&self, form_type: &str) -> Option<&FormEntry> {
        self.forms.get(form_type)
    }

    /// Properties of a form type; empty for unknown form types.
    pub fn properties(&self, form_type: &str) -> impl Iterator<Item = (&str, PropertyType)> {
        self.forms
            .get(form_type)
            .into_iter()
            .flat_map(|entry| entry.properties.iter())
            .map(|(name, property_type)| (name.as_str(), *property_type))
    }

    /// Semantic type of a property across all form types.
    pub fn property_type(&self, property: &str) -> Option<PropertyType> {
        self.property_types.get(property).copied()
    }

    pub fn property_name(&self, property: &str) -> Option<&str> {
        self.property_names.get(property).map(String::as_str)
    }

    pub fn template(&self, form_type: &str) -> Option<&str> {
        self.forms.get(form_type).map(|entry| entry.template.as_str())
    }

    pub fn action(&self, form_type: &str) -> Option<&str> {
        self.forms
            .get(form_type)
            .and_then(|entry| entry.action.as_deref())
    }

    pub fn service_fields(&self, form_type: &str) -> &[String] {
        self.forms
            .get(form_type)
            .map(|entry| entry.service_fields.as_slice())
            .unwrap_or_default()
    }

    pub fn form_types(&self) -> impl Iterator<Item = &str> {
        self.forms.keys().map(String::as_str)
    }
}
