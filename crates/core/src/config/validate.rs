use super::{types::Config, ConfigError};

/// Validate configuration
///
/// Checks the parts serde cannot express:
/// - non-empty shop base URL
/// - at least one primary section
/// - every section template contains the `{page}` placeholder
/// - page bound and scan depth are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.catalog.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.base_url cannot be empty".to_string(),
        ));
    }

    if config.catalog.primary_sections.is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.primary_sections cannot be empty".to_string(),
        ));
    }

    let sections = config
        .catalog
        .primary_sections
        .iter()
        .chain(config.catalog.secondary_sections.iter());
    for template in sections {
        if !template.contains("{page}") {
            return Err(ConfigError::ValidationError(format!(
                "section template missing {{page}} placeholder: {}",
                template
            )));
        }
    }

    if config.catalog.max_page == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.max_page cannot be 0".to_string(),
        ));
    }

    if config.pinboard.enabled && config.pinboard.scan_depth == 0 {
        return Err(ConfigError::ValidationError(
            "pinboard.scan_depth cannot be 0 when enabled".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn valid_config() -> Config {
        load_config_from_str(
            r#"
[catalog]
base_url = "https://shop.example.com"
primary_sections = ["https://shop.example.com/?page={page}"]
secondary_sections = ["https://shop.example.com/techno/?page={page}"]

[index]
base_url = "https://index.example.com"
access_token = "secret"

[feed]
base_url = "https://feed.example.com"
access_token = "secret"
owner_id = -1234
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_no_primary_sections_fails() {
        let mut config = valid_config();
        config.catalog.primary_sections.clear();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_template_without_placeholder_fails() {
        let mut config = valid_config();
        config
            .catalog
            .secondary_sections
            .push("https://shop.example.com/house/".to_string());
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_zero_max_page_fails() {
        let mut config = valid_config();
        config.catalog.max_page = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_scan_depth_ok_when_disabled() {
        let mut config = valid_config();
        config.pinboard.enabled = false;
        config.pinboard.scan_depth = 0;
        assert!(validate_config(&config).is_ok());
    }
}
