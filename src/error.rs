use chrono::NaiveDate;
use thiserror::Error;

/// A form field that failed validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplicationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("invalid email address: {value}")]
    InvalidEmail { value: String },

    #[error("loan amount ${amount} outside ${min}-${max}")]
    AmountOutOfRange { amount: f64, min: f64, max: f64 },

    #[error("monthly income must be a non-negative number, got {income}")]
    InvalidIncome { income: f64 },

    #[error("credit score {score} outside {min}-{max}")]
    CreditScoreOutOfRange { score: u32, min: u32, max: u32 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculatorError {
    #[error("loan term must be at least one month")]
    ZeroTerm,

    #[error("principal must be a positive amount, got {principal}")]
    InvalidPrincipal { principal: f64 },

    #[error("annual rate must be a non-negative number, got {rate}")]
    InvalidRate { rate: f64 },

    #[error("no finite payment for principal {principal} over {term_months} months at rate {annual_rate}")]
    NonFiniteResult {
        principal: f64,
        term_months: u32,
        annual_rate: f64,
    },

    #[error("payment date {months} months after {start} is out of range")]
    DateOutOfRange { start: NaiveDate, months: u32 },
}

/// Raised when a form option value does not name a known variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ApplicationError, CalculatorError, ParseError};

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ApplicationError::MissingField { field: "email" }.to_string(),
            "email is required"
        );
        assert_eq!(
            CalculatorError::ZeroTerm.to_string(),
            "loan term must be at least one month"
        );
        assert_eq!(
            ParseError::new("loan purpose", "vacation").to_string(),
            "unknown loan purpose 'vacation'"
        );
    }
}
