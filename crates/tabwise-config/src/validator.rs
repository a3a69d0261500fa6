//! Configuration validation.

use crate::schema::{Config, MAX_INACTIVE_THRESHOLD_MINUTES};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_api(config, &mut result);
        Self::validate_retry(config, &mut result);
        Self::validate_assistant(config, &mut result);
        Self::validate_history(config, &mut result);
        Self::validate_tabs(config, &mut result);

        result
    }

    fn validate_api(config: &Config, result: &mut ValidationResult) {
        let base_url = config.api.base_url.trim();
        if base_url.is_empty() {
            result.add_error(ValidationError::new("api.base_url", "Base URL cannot be empty"));
        } else if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            result.add_error(ValidationError::new(
                "api.base_url",
                "Base URL must start with http:// or https://",
            ));
        }

        if config.api.model.trim().is_empty() {
            result.add_error(ValidationError::new("api.model", "Model cannot be empty"));
        }

        if !config.api.has_api_key() {
            result.add_warning(ValidationWarning::new(
                "api.api_key",
                "No API key configured; assistant requests will fail until one is set",
            ));
        }

        if config.api.timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "api.timeout_seconds",
                "timeout_seconds must be greater than 0",
            ));
        }
    }

    fn validate_retry(config: &Config, result: &mut ValidationResult) {
        if config.retry.base_delay_ms > config.retry.max_delay_ms {
            result.add_error(ValidationError::new(
                "retry.base_delay_ms",
                "base_delay_ms cannot exceed max_delay_ms",
            ));
        }

        if config.retry.max_retries > 10 {
            result.add_warning(ValidationWarning::new(
                "retry.max_retries",
                "max_retries is very high (>10), failing requests may take a long time",
            ));
        }
    }

    fn validate_assistant(config: &Config, result: &mut ValidationResult) {
        let temperature = config.assistant.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            result.add_error(ValidationError::new(
                "assistant.temperature",
                "temperature must be between 0.0 and 2.0",
            ));
        }

        if config.assistant.max_tokens == 0 {
            result.add_error(ValidationError::new(
                "assistant.max_tokens",
                "max_tokens must be greater than 0",
            ));
        }

        if config.assistant.context_turns > config.history.max_turns {
            result.add_warning(ValidationWarning::new(
                "assistant.context_turns",
                "context_turns exceeds history.max_turns; only stored turns can be used",
            ));
        }
    }

    fn validate_history(config: &Config, result: &mut ValidationResult) {
        if config.history.max_turns == 0 {
            result.add_error(ValidationError::new(
                "history.max_turns",
                "max_turns must be greater than 0",
            ));
        }

        if config.history.max_turns > 500 {
            result.add_warning(ValidationWarning::new(
                "history.max_turns",
                "max_turns is very high (>500), the history file may grow large",
            ));
        }
    }

    fn validate_tabs(config: &Config, result: &mut ValidationResult) {
        if config.tabs.inactive_threshold_minutes == 0 {
            result.add_error(ValidationError::new(
                "tabs.inactive_threshold_minutes",
                "inactive_threshold_minutes must be greater than 0",
            ));
        } else if config.tabs.inactive_threshold_minutes > MAX_INACTIVE_THRESHOLD_MINUTES {
            result.add_error(ValidationError::new(
                "tabs.inactive_threshold_minutes",
                format!(
                    "inactive_threshold_minutes cannot exceed {}",
                    MAX_INACTIVE_THRESHOLD_MINUTES
                ),
            ));
        }

        if config.tabs.keep_keywords.iter().any(|k| k.trim().is_empty()) {
            result.add_warning(ValidationWarning::new(
                "tabs.keep_keywords",
                "Empty keep keywords are ignored",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
