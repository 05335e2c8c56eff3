//! Range and enumeration checks applied to parsed arguments before dispatch.

use crate::types::{Capability, Verbosity};
use thiserror::Error;

/// Shortest MFA session AWS accepts, in seconds
pub const MIN_MFA_DURATION: i64 = 1;
/// Longest MFA session AWS accepts (36 hours), in seconds
pub const MAX_MFA_DURATION: i64 = 129_600;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("You should specify value for duration of MFA token greater than zero (got {0})")]
    DurationTooShort(i64),
    #[error("You should specify value for duration of MFA token not greater than 129600 seconds (36 hours), got {0}")]
    DurationTooLong(i64),
    #[error("You specified invalid value for --verbosity flag: `{0}` (expected TRACE, DEBUG, INFO or ERROR)")]
    InvalidVerbosity(String),
    #[error("Unknown capability `{0}` (expected CAPABILITY_IAM or CAPABILITY_NAMED_IAM)")]
    InvalidCapability(String),
}

/// Check an explicitly supplied MFA duration. Bounds are checked separately.
pub fn validate_duration(duration: i64) -> Result<u32, ValidationError> {
    if duration < MIN_MFA_DURATION {
        return Err(ValidationError::DurationTooShort(duration));
    }
    if duration > MAX_MFA_DURATION {
        return Err(ValidationError::DurationTooLong(duration));
    }
    // 129600 fits in u32
    Ok(duration as u32)
}

/// An empty string means "unset" and is not an error.
pub fn validate_verbosity(raw: &str) -> Result<Option<Verbosity>, ValidationError> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<Verbosity>()
        .map(Some)
        .map_err(ValidationError::InvalidVerbosity)
}

/// Re-check capability names; clap already restricts them, but they may also come
/// from other free-text sources.
pub fn validate_capabilities<S: AsRef<str>>(
    raw: &[S],
) -> Result<Vec<Capability>, ValidationError> {
    let mut capabilities = Vec::with_capacity(raw.len());
    for name in raw {
        let capability = name
            .as_ref()
            .parse::<Capability>()
            .map_err(ValidationError::InvalidCapability)?;
        if !capabilities.contains(&capability) {
            capabilities.push(capability);
        }
    }
    Ok(capabilities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_bounds() {
        assert_eq!(validate_duration(1), Ok(1));
        assert_eq!(validate_duration(3600), Ok(3600));
        assert_eq!(validate_duration(129_600), Ok(129_600));
        assert_eq!(
            validate_duration(0),
            Err(ValidationError::DurationTooShort(0))
        );
        assert_eq!(
            validate_duration(-10),
            Err(ValidationError::DurationTooShort(-10))
        );
        assert_eq!(
            validate_duration(129_601),
            Err(ValidationError::DurationTooLong(129_601))
        );
    }

    #[test]
    fn test_duration_messages_are_distinct() {
        let low = validate_duration(0).unwrap_err().to_string();
        let high = validate_duration(129_601).unwrap_err().to_string();
        assert_ne!(low, high);
        assert!(high.contains("129600"));
    }

    #[test]
    fn test_duration_iff_in_range() {
        for d in [-1, 0, 1, 2, 59, 3600, 129_599, 129_600, 129_601, i64::MAX] {
            let in_range = (1..=129_600).contains(&d);
            assert_eq!(validate_duration(d).is_ok(), in_range, "duration {}", d);
        }
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(validate_verbosity(""), Ok(None));
        assert_eq!(validate_verbosity("TRACE"), Ok(Some(Verbosity::Trace)));
        assert_eq!(validate_verbosity("DEBUG"), Ok(Some(Verbosity::Debug)));
        assert_eq!(validate_verbosity("INFO"), Ok(Some(Verbosity::Info)));
        assert_eq!(validate_verbosity("ERROR"), Ok(Some(Verbosity::Error)));
        assert_eq!(
            validate_verbosity("debug"),
            Err(ValidationError::InvalidVerbosity("debug".to_string()))
        );
        assert!(validate_verbosity("WARN").is_err());
    }

    #[test]
    fn test_capabilities() {
        assert_eq!(
            validate_capabilities(&["CAPABILITY_NAMED_IAM", "CAPABILITY_IAM"]),
            Ok(vec![Capability::NamedIam, Capability::Iam])
        );
        // repeated names collapse
        assert_eq!(
            validate_capabilities(&["CAPABILITY_IAM", "CAPABILITY_IAM"]),
            Ok(vec![Capability::Iam])
        );
        assert_eq!(
            validate_capabilities(&["capability_iam"]),
            Err(ValidationError::InvalidCapability("capability_iam".to_string()))
        );
        assert_eq!(validate_capabilities::<&str>(&[]), Ok(vec![]));
    }
}
