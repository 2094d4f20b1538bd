//! Form registry and form postprocessing
//!
//! Form types are declared with [`FormSchema`] and registered once at startup
//! through [`FormRegistryBuilder`]. The resulting [`FormRegistry`] is
//! read-only and drives how [`postprocess`] converts submitted form data.

pub mod catalog;
pub mod fields;
pub mod postprocess;
pub mod registry;

use thiserror::Error;

pub use catalog::default_registry;
pub use fields::{FieldKind, FieldSpec, PropertyType};
pub use postprocess::{FormData, ProcessedForm, UploadedFile, postprocess};
pub use registry::{FormEntry, FormRegistry, FormRegistryBuilder, FormSchema, Relation};

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Invalid value for {property} ({property_type}): {message}")]
    Conversion {
        property: String,
        property_type: PropertyType,
        message: String,
    },
}

pub type FormResult<T> = Result<T, FormError>;
