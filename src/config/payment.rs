//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::storage::is_http_url;

/// Deployment environment of the payment provider
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Payment configuration (hosted checkout and billing portal)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    pub checkout_base_url: String,
    pub portal_base_url: String,

    /// Provider API key; required in production
    pub api_key: Option<SecretString>,

    pub environment: Environment,
}

impl PaymentConfig {
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("PAYMENT__CHECKOUT_BASE_URL", &self.checkout_base_url),
            ("PAYMENT__PORTAL_BASE_URL", &self.portal_base_url),
        ] {
            if !is_http_url(value) {
                return Err(ValidationError::InvalidUrl {
                    field,
                    value: value.clone(),
                });
            }
            if self.is_production() && !value.starts_with("https://") {
                return Err(ValidationError::MustBeHttps { field });
            }
        }

        if self.is_production() {
            let has_key = self
                .api_key
                .as_ref()
                .is_some_and(|key| !key.expose_secret().is_empty());
            if !has_key {
                return Err(ValidationError::MissingRequired("PAYMENT__API_KEY"));
            }
        }

        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            checkout_base_url: "http://localhost:8080/checkout".to_string(),
            portal_base_url: "http://localhost:8080/billing".to_string(),
            api_key: None,
            environment: Environment::Development,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn production() -> PaymentConfig {
        PaymentConfig {
            checkout_base_url: "https://pay.example.com/checkout".to_string(),
            portal_base_url: "https://pay.example.com/portal".to_string(),
            api_key: Some(SecretString::new("sk_live_xxx".to_string())),
            environment: Environment::Production,
        }
    }

    #[test]
    fn development_defaults_are_valid() {
        let config = PaymentConfig::default();
        assert!(!config.is_production());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn production_config_is_valid() {
        assert!(production().validate().is_ok());
    }

    #[test]
    fn production_requires_https() {
        let config = PaymentConfig {
            portal_base_url: "http://pay.example.com/portal".to_string(),
            ..production()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MustBeHttps {
                field: "PAYMENT__PORTAL_BASE_URL"
            })
        );
    }

    #[test]
    fn production_requires_api_key() {
        let config = PaymentConfig {
            api_key: None,
            ..production()
        };
        assert!(config.validate().is_err());

        let config = PaymentConfig {
            api_key: Some(SecretString::new(String::new())),
            ..production()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn api_key_is_redacted_in_debug() {
        let rendered = format!("{:?}", production());
        assert!(!rendered.contains("sk_live_xxx"));
    }
}
