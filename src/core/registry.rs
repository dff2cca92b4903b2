use crate::domain::model::{SelectorEntry, ServiceDescriptor};
use crate::utils::error::{ExportError, Result};
use crate::utils::validation::{validate_file_stem, validate_non_empty_string, validate_unique};
use std::collections::HashMap;

/// Selector that expands to every registered selector.
pub const ALL_SELECTOR: &str = "-all";

/// Read-only mapping from selectors to service descriptors.
///
/// Built once at startup; construction runs the integrity checks so lookups
/// on a constructed registry only fail for input that came from the user.
#[derive(Debug, Clone)]
pub struct Registry {
    services: Vec<ServiceDescriptor>,
    selectors: Vec<SelectorEntry>,
    service_index: HashMap<String, usize>,
    selector_index: HashMap<String, usize>,
}

impl Registry {
    pub fn new(services: Vec<ServiceDescriptor>, selectors: Vec<SelectorEntry>) -> Result<Self> {
        validate_unique(
            "services.service_key",
            services.iter().map(|s| s.service_key.as_str()),
        )?;
        validate_unique(
            "selectors.selector",
            selectors.iter().map(|s| s.selector.as_str()),
        )?;

        for service in &services {
            validate_non_empty_string("services.service_key", &service.service_key)?;
            validate_non_empty_string("services.listing_operation", &service.listing_operation)?;
            validate_non_empty_string(
                "services.response_collection_key",
                &service.response_collection_key,
            )?;
            if service.attributes.is_empty() {
                return Err(ExportError::InvalidConfigValueError {
                    field: "services.attributes".to_string(),
                    value: service.service_key.clone(),
                    reason: "At least one attribute is required".to_string(),
                });
            }
            for attribute in &service.attributes {
                validate_non_empty_string("services.attributes", attribute)?;
            }
        }

        let service_index: HashMap<String, usize> = services
            .iter()
            .enumerate()
            .map(|(i, s)| (s.service_key.clone(), i))
            .collect();

        for entry in &selectors {
            validate_non_empty_string("selectors.selector", &entry.selector)?;
            validate_file_stem("selectors.base_filename", &entry.base_filename)?;
            if entry.selector == ALL_SELECTOR {
                return Err(ExportError::InvalidConfigValueError {
                    field: "selectors.selector".to_string(),
                    value: entry.selector.clone(),
                    reason: format!("'{}' is reserved", ALL_SELECTOR),
                });
            }
            if !service_index.contains_key(&entry.service_key) {
                return Err(ExportError::UnknownService {
                    service: entry.service_key.clone(),
                    selector: Some(entry.selector.clone()),
                });
            }
        }

        let selector_index = selectors
            .iter()
            .enumerate()
            .map(|(i, s)| (s.selector.clone(), i))
            .collect();

        tracing::debug!(
            "Registry initialised with {} services and {} selectors",
            services.len(),
            selectors.len()
        );

        Ok(Self {
            services,
            selectors,
            service_index,
            selector_index,
        })
    }

    pub fn lookup(&self, service_key: &str) -> Result<&ServiceDescriptor> {
        self.service_index
            .get(service_key)
            .map(|&i| &self.services[i])
            .ok_or_else(|| ExportError::UnknownService {
                service: service_key.to_string(),
                selector: None,
            })
    }

    pub fn resolve_selector(&self, selector: &str) -> Result<&SelectorEntry> {
        self.selector_index
            .get(selector)
            .map(|&i| &self.selectors[i])
            .ok_or_else(|| ExportError::UnknownSelector {
                selector: selector.to_string(),
            })
    }

    /// Selector entries in declaration order.
    pub fn selectors(&self) -> &[SelectorEntry] {
        &self.selectors
    }

    pub fn services(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    /// Human-readable listing of every selector, used by `--list`.
    pub fn describe(&self) -> String {
        let mut out = format!("{:<8} {:<16} {:<28} {}\n", "Option", "Service", "Operation", "Columns");
        out.push_str(&format!("{:<8} {}\n", ALL_SELECTOR, "Exports all resources"));
        for entry in &self.selectors {
            if let Ok(service) = self.lookup(&entry.service_key) {
                out.push_str(&format!(
                    "{:<8} {:<16} {:<28} {}\n",
                    entry.selector,
                    service.service_key,
                    service.listing_operation,
                    service.attributes.join(",")
                ));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn services() -> Vec<ServiceDescriptor> {
        vec![
            ServiceDescriptor::new("s3", "list_buckets", "Buckets", &["Name", "CreationDate"]),
            ServiceDescriptor::new("glue", "get_jobs", "Jobs", &["Name", "Role"]),
        ]
    }

    fn selectors() -> Vec<SelectorEntry> {
        vec![
            SelectorEntry::new("-s3", "s3_buckets", "s3"),
            SelectorEntry::new("-gl", "glue_jobs", "glue"),
        ]
    }

    #[test]
    fn test_lookup_and_resolve() {
        let registry = Registry::new(services(), selectors()).unwrap();

        let entry = registry.resolve_selector("-s3").unwrap();
        assert_eq!(entry.base_filename, "s3_buckets");

        let service = registry.lookup(&entry.service_key).unwrap();
        assert_eq!(service.listing_operation, "list_buckets");
        assert_eq!(service.attributes, vec!["Name", "CreationDate"]);
    }

    #[test]
    fn test_unknown_selector() {
        let registry = Registry::new(services(), selectors()).unwrap();
        assert!(matches!(
            registry.resolve_selector("-xx"),
            Err(ExportError::UnknownSelector { selector }) if selector == "-xx"
        ));
    }

    #[test]
    fn test_selector_with_missing_service_fails_construction() {
        let mut selectors = selectors();
        selectors.push(SelectorEntry::new("-ds", "dms_tasks", "dms"));

        let err = Registry::new(services(), selectors).unwrap_err();
        assert!(matches!(
            err,
            ExportError::UnknownService { selector, service }
                if selector.as_deref() == Some("-ds") && service == "dms"
        ));
    }

    #[test]
    fn test_rejects_duplicates_and_empty_attributes() {
        let mut dup = selectors();
        dup.push(SelectorEntry::new("-s3", "again", "s3"));
        assert!(Registry::new(services(), dup).is_err());

        let mut empty = services();
        empty[0].attributes.clear();
        assert!(Registry::new(empty, selectors()).is_err());
    }

    #[test]
    fn test_all_selector_is_reserved() {
        let mut selectors = selectors();
        selectors.push(SelectorEntry::new(ALL_SELECTOR, "everything", "s3"));
        assert!(Registry::new(services(), selectors).is_err());
    }

    #[test]
    fn test_selectors_keep_declaration_order() {
        let registry = Registry::new(services(), selectors()).unwrap();
        let order: Vec<&str> = registry.selectors().iter().map(|s| s.selector.as_str()).collect();
        assert_eq!(order, vec!["-s3", "-gl"]);
        assert!(registry.describe().contains("list_buckets"));
    }
}
