//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Above this the reader still works, but responses get unwieldy.
const MAX_ROWS_WARNING_THRESHOLD: usize = 1000;

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

    /// Turn the first error into a [`ConfigError`], keeping the warnings.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

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
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_snapshot(config, &mut result);
        Self::validate_reader(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    fn validate_snapshot(config: &Config, result: &mut ValidationResult) {
        let snapshot = &config.snapshot;

        if !is_js_identifier(&snapshot.variable) {
            result.add_error(ValidationError::new(
                "snapshot.variable",
                format!("'{}' is not a valid JavaScript identifier", snapshot.variable),
            ));
        }

        if snapshot.companion_marker.trim().is_empty() {
            result.add_error(ValidationError::new(
                "snapshot.companion_marker",
                "companion_marker cannot be empty",
            ));
        }
    }

    fn validate_reader(config: &Config, result: &mut ValidationResult) {
        let max_rows = config.reader.default_max_rows;

        if max_rows == 0 {
            result.add_error(ValidationError::new(
                "reader.default_max_rows",
                "default_max_rows must be greater than 0",
            ));
        }

        if max_rows > MAX_ROWS_WARNING_THRESHOLD {
            result.add_warning(ValidationWarning::new(
                "reader.default_max_rows",
                format!(
                    "default_max_rows is very high (>{}), responses may be large",
                    MAX_ROWS_WARNING_THRESHOLD
                ),
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        if config.logging.level.trim().is_empty() {
            result.add_error(ValidationError::new(
                "logging.level",
                "level cannot be empty",
            ));
        }
    }
}

/// ASCII subset: a letter, `_` or `$`, then letters, digits, `_` or `$`.
fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let is_part = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$';
    (first.is_ascii_alphabetic() || first == '_' || first == '$') && chars.all(is_part)
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
