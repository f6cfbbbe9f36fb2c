use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("dispatch.queue_capacity must be at least 1")]
    ZeroQueueCapacity,

    #[error("api.providers is empty (at least one provider is required)")]
    NoProviders,

    #[error("api.providers contains a blank entry at position {index}")]
    BlankProvider { index: usize },

    #[error("api.page must be at least 1")]
    ZeroPage,

    #[error("Invalid metadata endpoint '{endpoint}', expected 'http://' or 'https://'")]
    InvalidEndpointScheme { endpoint: String },

    #[error("http.max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("HTTP timeout must be positive: {field} = 0")]
    ZeroTimeout { field: &'static str },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_dispatch(config)?;
    validate_api(config)?;
    validate_http(config)?;
    Ok(())
}

fn validate_dispatch(config: &Config) -> Result<(), ValidationError> {
    if config.dispatch.queue_capacity == 0 {
        return Err(ValidationError::ZeroQueueCapacity);
    }
    Ok(())
}

fn validate_api(config: &Config) -> Result<(), ValidationError> {
    let api = &config.api;

    if !(api.endpoint.starts_with("http://") || api.endpoint.starts_with("https://")) {
        return Err(ValidationError::InvalidEndpointScheme {
            endpoint: api.endpoint.clone(),
        });
    }

    if api.providers.is_empty() {
        return Err(ValidationError::NoProviders);
    }

    if let Some(index) = api.providers.iter().position(|p| p.trim().is_empty()) {
        return Err(ValidationError::BlankProvider { index });
    }

    if api.page == 0 {
        return Err(ValidationError::ZeroPage);
    }

    Ok(())
}

fn validate_http(config: &Config) -> Result<(), ValidationError> {
    let http = &config.http;

    if http.max_attempts == 0 {
        return Err(ValidationError::ZeroAttempts);
    }
    if http.connect_timeout_secs == 0 {
        return Err(ValidationError::ZeroTimeout {
            field: "connect_timeout_secs",
        });
    }
    if http.request_timeout_secs == 0 {
        return Err(ValidationError::ZeroTimeout {
            field: "request_timeout_secs",
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_queue_capacity() {
        let mut config = Config::default();
        config.dispatch.queue_capacity = 0;

        assert!(matches!(
            validate(&config),
            Err(ValidationError::ZeroQueueCapacity)
        ));
    }

    #[test]
    fn test_provider_list_checks() {
        let mut config = Config::default();
        config.api.providers.clear();
        assert!(matches!(validate(&config), Err(ValidationError::NoProviders)));

        config.api.providers = vec!["qq".to_string(), "  ".to_string()];
        assert!(matches!(
            validate(&config),
            Err(ValidationError::BlankProvider { index: 1 })
        ));
    }

    #[test]
    fn test_endpoint_scheme() {
        let mut config = Config::default();
        config.api.endpoint = "ftp://music.example".to_string();

        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidEndpointScheme { .. }));
        assert!(err.to_string().contains("ftp://music.example"));
    }

    #[test]
    fn test_http_limits() {
        let mut config = Config::default();
        config.http.max_attempts = 0;
        assert!(matches!(validate(&config), Err(ValidationError::ZeroAttempts)));

        let mut config = Config::default();
        config.http.request_timeout_secs = 0;
        assert!(matches!(
            validate(&config),
            Err(ValidationError::ZeroTimeout {
                field: "request_timeout_secs"
            })
        ));
    }
}
