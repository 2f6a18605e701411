use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid header format: '{value}'. Expected 'Key: Value'")]
    InvalidHeaderFormat { value: String },
    #[error("Delay must not be empty.")]
    DelayEmpty,
    #[error("Invalid delay '{value}'. Use seconds (e.g. 0.5) or a ms/s suffix.")]
    InvalidDelay { value: String },
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Missing target: pass --url or provide a config file with targets.")]
    MissingTarget,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: String },
}

#[cfg(test)]
impl From<String> for ValidationError {
    fn from(message: String) -> Self {
        ValidationError::TestExpectation { message }
    }
}

#[cfg(test)]
impl From<&str> for ValidationError {
    fn from(message: &str) -> Self {
        ValidationError::TestExpectation {
            message: message.to_owned(),
        }
    }
}
