use crate::domain::{
    entities::{ProjectConfig, Resource},
    error::DomainError,
};

/// Centralized domain validation.
///
/// Scaffolders call this before building any entry list, so a missing
/// identity field never surfaces halfway through a run.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_config(config: &ProjectConfig) -> Result<(), DomainError> {
        config.validate()
    }

    /// Reject re-creating an API the project already records, unless forced.
    pub fn validate_new_api(
        config: &ProjectConfig,
        resource: &Resource,
        force: bool,
    ) -> Result<(), DomainError> {
        resource.validate()?;
        if resource.has_api() && !force && config.has_api_for(resource) {
            return Err(DomainError::ResourceExists {
                gvk: resource.to_string(),
            });
        }
        Ok(())
    }
}
