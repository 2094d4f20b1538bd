//! Forms shipped with eNMS for the objects served by the REST API.

use super::{FieldKind, FieldSpec, FormRegistry, FormRegistryBuilder, FormSchema, Relation};

fn relation(property: &str, model: &str, list: bool) -> Relation {
    Relation {
        property: property.to_string(),
        model: model.to_string(),
        list,
    }
}

fn object_fields(schema: FormSchema) -> FormSchema {
    schema
        .field(FieldSpec::new("form_type", FieldKind::Hidden))
        .field(FieldSpec::new("id", FieldKind::Hidden))
        .field(FieldSpec::labeled("name", FieldKind::String, "Name"))
        .field(FieldSpec::labeled("description", FieldKind::String, "Description"))
}

fn device_form() -> FormSchema {
    object_fields(FormSchema::new("device").template("object").action("processData"))
        .field(FieldSpec::labeled("subtype", FieldKind::Select, "Subtype"))
        .field(FieldSpec::labeled("vendor", FieldKind::String, "Vendor"))
        .field(FieldSpec::labeled("model", FieldKind::String, "Model"))
        .field(FieldSpec::labeled("location", FieldKind::String, "Location"))
        .field(FieldSpec::labeled("operating_system", FieldKind::String, "Operating System"))
        .field(FieldSpec::labeled("os_version", FieldKind::String, "OS Version"))
        .field(FieldSpec::labeled("ip_address", FieldKind::String, "IP address"))
        .field(FieldSpec::labeled("port", FieldKind::Integer, "Port"))
        .field(FieldSpec::labeled("username", FieldKind::String, "Username"))
        .field(FieldSpec::labeled("password", FieldKind::Password, "Password"))
        .field(FieldSpec::labeled("enable_password", FieldKind::Password, "'Enable' Password"))
}

fn link_form() -> FormSchema {
    object_fields(FormSchema::new("link").template("object").action("processData"))
}

fn pool_form() -> FormSchema {
    object_fields(FormSchema::new("pool").action("processData"))
        .field(FieldSpec::labeled("criteria", FieldKind::Dict, "Device criteria"))
        .field(FieldSpec::labeled("never_update", FieldKind::Boolean, "Never update"))
}

fn user_form() -> FormSchema {
    object_fields(FormSchema::new("user").action("processData"))
        .field(FieldSpec::labeled("email", FieldKind::String, "Email"))
        .field(FieldSpec::labeled("password", FieldKind::Password, "Password"))
}

fn job_form() -> FormSchema {
    object_fields(FormSchema::new("job").template("job").action("processJobData"))
        .field(FieldSpec::new("job_type", FieldKind::Hidden))
        .field(FieldSpec::labeled("multiprocessing", FieldKind::Boolean, "Multiprocessing"))
        .field(FieldSpec::labeled("max_processes", FieldKind::Integer, "Maximum number of processes"))
        .field(FieldSpec::labeled("payload", FieldKind::Json, "Default payload"))
        .field(FieldSpec::new("submit", FieldKind::Submit))
}

fn service_form() -> FormSchema {
    FormSchema::new("service")
        .template("service")
        .action("processJobData")
        .inherits("job")
}

fn netmiko_form() -> FormSchema {
    FormSchema::new("netmiko")
        .abstract_service()
        .field(FieldSpec::labeled("driver", FieldKind::Select, "Driver"))
        .field(FieldSpec::labeled("use_device_driver", FieldKind::Boolean, "Use driver from device"))
        .field(FieldSpec::labeled("fast_cli", FieldKind::Boolean, "Fast CLI"))
        .field(FieldSpec::labeled("timeout", FieldKind::Integer, "Timeout"))
        .field(FieldSpec::labeled("delay_factor", FieldKind::Float, "Delay Factor"))
}

fn netmiko_configuration_form() -> FormSchema {
    FormSchema::new("netmiko_configuration_service")
        .template("service")
        .action("processJobData")
        .inherits("service")
        .inherits("netmiko")
        .field(FieldSpec::labeled("content", FieldKind::String, "Content"))
        .field(FieldSpec::labeled("commit_configuration", FieldKind::Boolean, "Commit"))
        .field(FieldSpec::labeled("exit_config_mode", FieldKind::Boolean, "Exit config mode"))
}

/// Register the built-in forms and their relationships.
pub fn register_defaults(builder: FormRegistryBuilder) -> FormRegistryBuilder {
    builder
        .register(device_form())
        .register(link_form())
        .register(pool_form())
        .register(user_form())
        .configure_relationships("pool", &[relation("devices", "Device", true)])
        .configure_relationships(
            "link",
            &[
                relation("source", "Device", false),
                relation("destination", "Device", false),
            ],
        )
        // Relationships must be in place before child forms copy the job properties.
        .register(job_form())
        .configure_relationships(
            "job",
            &[relation("devices", "Device", true), relation("pools", "Pool", true)],
        )
        .register(service_form())
        .register(netmiko_form())
        .register(netmiko_configuration_form())
}

/// Registry holding every built-in form.
pub fn default_registry() -> FormRegistry {
    register_defaults(FormRegistry::builder()).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::PropertyType;

    #[test]
    fn test_default_registry_forms() {
        let registry = default_registry();
        for form_type in [
            "device",
            "link",
            "pool",
            "user",
            "job",
            "service",
            "netmiko",
            "netmiko_configuration_service",
        ] {
            assert!(registry.form(form_type).is_some(), "{form_type} missing");
        }
        assert_eq!(registry.template("device"), Some("object"));
        assert_eq!(registry.template("pool"), Some("base"));
    }

    #[test]
    fn test_relationships_are_object_properties() {
        let registry = default_registry();
        let pool: Vec<_> = registry.properties("pool").collect();
        assert!(pool.contains(&("devices", PropertyType::ObjectList)));
        let link: Vec<_> = registry.properties("link").collect();
        assert!(link.contains(&("source", PropertyType::Object)));
        assert!(link.contains(&("destination", PropertyType::Object)));
    }

    #[test]
    fn test_configuration_service_fields() {
        let registry = default_registry();
        let fields = registry.service_fields("netmiko_configuration_service");
        for expected in ["content", "commit_configuration", "driver", "timeout", "delay_factor"] {
            assert!(fields.iter().any(|f| f == expected), "{expected} missing");
        }
        assert!(!fields.iter().any(|f| f == "name"));
        assert!(
            registry
                .properties("netmiko_configuration_service")
                .any(|(name, _)| name == "pools")
        );
    }
}
