//! Throttle period
//!
//! `Tau` is the minimum spacing, in milliseconds, between the starts of two
//! consecutive jobs. Every constructor funnels through [`Tau::from_millis`],
//! so a `Tau` value is always finite, non-negative and representable as a
//! [`Duration`].

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::ThrottleError;

/// Validated throttle period in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Tau(f64);

impl Tau {
    /// No enforced delay; jobs still run one at a time
    pub const ZERO: Tau = Tau(0.0);

    /// Validate a period given in milliseconds
    pub fn from_millis(millis: f64) -> Result<Self, ThrottleError> {
        if millis.is_nan() || millis.is_infinite() || millis < 0.0 {
            return Err(ThrottleError::invalid(millis));
        }
        if millis == 0.0 {
            // Folds -0.0 into 0.0
            return Ok(Self::ZERO);
        }
        // Values too large for a Duration cannot be armed as a timer
        if Duration::try_from_secs_f64(millis / 1000.0).is_err() {
            return Err(ThrottleError::invalid(millis));
        }
        Ok(Self(millis))
    }

    /// The period in milliseconds
    pub fn as_millis(&self) -> f64 {
        self.0
    }

    /// The period as a timer duration
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs_f64(self.0 / 1000.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl fmt::Display for Tau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl TryFrom<f64> for Tau {
    type Error = ThrottleError;

    fn try_from(millis: f64) -> Result<Self, Self::Error> {
        Tau::from_millis(millis)
    }
}

impl From<Tau> for f64 {
    fn from(tau: Tau) -> f64 {
        tau.0
    }
}

impl TryFrom<Duration> for Tau {
    type Error = ThrottleError;

    fn try_from(duration: Duration) -> Result<Self, Self::Error> {
        Tau::from_millis(duration.as_secs_f64() * 1000.0)
    }
}

impl FromStr for Tau {
    type Err = ThrottleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let millis: f64 = s.trim().parse().map_err(|_| ThrottleError::invalid(format!("{:?}", s)))?;
        Tau::from_millis(millis)
    }
}

/// Dynamically typed input: only numbers are accepted
impl TryFrom<&Value> for Tau {
    type Error = ThrottleError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(millis) => Tau::from_millis(millis),
                None => Err(ThrottleError::invalid(n)),
            },
            Value::Null => Err(ThrottleError::invalid("null")),
            Value::Bool(b) => Err(ThrottleError::invalid(b)),
            Value::String(s) => Err(ThrottleError::invalid(format!("{:?}", s))),
            Value::Sequence(_) => Err(ThrottleError::invalid("sequence")),
            Value::Mapping(_) => Err(ThrottleError::invalid("mapping")),
            Value::Tagged(tagged) => Err(ThrottleError::invalid(format!("tagged {}", tagged.tag))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_non_negative_finite() {
        for millis in [0.0, 0.5, 1.0, 100.0, 86_400_000.0] {
            let tau = Tau::from_millis(millis).unwrap();
            assert_eq!(tau.as_millis(), millis);
        }
        assert!(Tau::from_millis(0.0).unwrap().is_zero());
    }

    #[test]
    fn test_rejects_nan_negative_and_infinite() {
        for millis in [f64::NAN, -1.0, -0.001, f64::NEG_INFINITY, f64::INFINITY, f64::MAX] {
            let err = Tau::from_millis(millis).unwrap_err();
            assert!(err.is_invalid_configuration(), "{millis} should be rejected");
        }
    }

    #[test]
    fn test_negative_zero_is_zero() {
        let tau = Tau::from_millis(-0.0).unwrap();
        assert!(tau.is_zero());
        assert_eq!(tau.as_duration(), Duration::ZERO);
    }

    #[test]
    fn test_duration_conversion() {
        let tau = Tau::from_millis(100.0).unwrap();
        assert_eq!(tau.as_duration(), Duration::from_millis(100));
        assert_eq!(Tau::try_from(Duration::from_millis(250)).unwrap().as_millis(), 250.0);
        assert_eq!(tau.to_string(), "100ms");
    }

    #[test]
    fn test_unrepresentable_duration_rejected() {
        let err = Tau::try_from(Duration::MAX).unwrap_err();
        assert!(err.is_invalid_configuration());

        let err = Tau::from_millis(Duration::MAX.as_secs_f64() * 1000.0).unwrap_err();
        assert!(err.is_invalid_configuration());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("100".parse::<Tau>().unwrap().as_millis(), 100.0);
        assert_eq!(" 2.5 ".parse::<Tau>().unwrap().as_millis(), 2.5);
        for s in ["", "abc", "NaN", "-1", "inf", "1ms", "true"] {
            assert!(s.parse::<Tau>().unwrap_err().is_invalid_configuration(), "{s:?} should be rejected");
        }
    }

    #[test]
    fn test_try_from_dynamic_value_rejects_non_numbers() {
        let invalid: Vec<Value> = vec![
            Value::Number(serde_yaml::Number::from(f64::NAN)),
            Value::Number(serde_yaml::Number::from(-1)),
            Value::String(String::new()),
            Value::String("100".to_string()),
            Value::Bool(true),
            Value::Null,
            Value::Sequence(vec![]),
            Value::Mapping(serde_yaml::Mapping::new()),
        ];
        for value in &invalid {
            let err = Tau::try_from(value).unwrap_err();
            assert!(err.is_invalid_configuration(), "{value:?} should be rejected");
        }
    }

    #[test]
    fn test_try_from_dynamic_value_accepts_numbers() {
        let tau = Tau::try_from(&Value::Number(serde_yaml::Number::from(42))).unwrap();
        assert_eq!(tau.as_millis(), 42.0);
        let tau = Tau::try_from(&Value::Number(serde_yaml::Number::from(0.25))).unwrap();
        assert_eq!(tau.as_millis(), 0.25);
    }

    #[test]
    fn test_deserialize_validates() {
        let tau: Tau = serde_yaml::from_str("150").unwrap();
        assert_eq!(tau.as_millis(), 150.0);

        let err = serde_yaml::from_str::<Tau>("-5").unwrap_err();
        assert!(err.to_string().contains("tau must be at least 0"));

        assert!(serde_yaml::from_str::<Tau>(".nan").is_err());
        assert!(serde_yaml::from_str::<Tau>("fast").is_err());
    }
}
