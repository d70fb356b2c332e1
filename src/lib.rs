//! Loan application intake and fixed-rate amortization.
//!
//! Two independent computations: [`eligibility`] decides whether an
//! applicant qualifies, and [`amortization`] prices a loan at a fixed rate.
//! [`application`] wraps the first with the intake form's field rules.

pub mod amortization;
pub mod application;
pub mod eligibility;
pub mod error;

pub use amortization::{
    calculate, calculate_default, AmortizationResult, AmortizationSchedule, ScheduledPayment,
    DEFAULT_ANNUAL_RATE,
};
pub use application::{
    submit, EmploymentStatus, LoanApplication, LoanPurpose, LoanTerm, Submission,
};
pub use eligibility::{debt_to_income_ratio, evaluate, Assessment, EligibilityPolicy};
pub use error::{ApplicationError, CalculatorError, ParseError};
