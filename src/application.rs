use log::info;
use std::{fmt, str::FromStr};

use crate::eligibility::{Assessment, EligibilityPolicy};
use crate::error::{ApplicationError, ParseError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const MIN_AMOUNT: f64 = 1_000.;
pub const MAX_AMOUNT: f64 = 100_000.;
pub const LOWEST_CREDIT_SCORE: u32 = 300;
pub const HIGHEST_CREDIT_SCORE: u32 = 850;

pub const APPROVED_MESSAGE: &str =
    "Congratulations! Your application has been submitted successfully.";
pub const DECLINED_MESSAGE: &str =
    "We're sorry, but you don't meet the eligibility criteria at this time.";

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum LoanPurpose {
    #[default]
    Personal,
    Business,
    Education,
    DebtConsolidation,
}

impl LoanPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanPurpose::Personal => "personal",
            LoanPurpose::Business => "business",
            LoanPurpose::Education => "education",
            LoanPurpose::DebtConsolidation => "debt-consolidation",
        }
    }
}

impl fmt::Display for LoanPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanPurpose {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(LoanPurpose::Personal),
            "business" => Ok(LoanPurpose::Business),
            "education" => Ok(LoanPurpose::Education),
            "debt-consolidation" => Ok(LoanPurpose::DebtConsolidation),
            _ => Err(ParseError::new("loan purpose", s)),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum EmploymentStatus {
    #[default]
    Employed,
    SelfEmployed,
    BusinessOwner,
}

impl EmploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentStatus::Employed => "employed",
            EmploymentStatus::SelfEmployed => "self-employed",
            EmploymentStatus::BusinessOwner => "business-owner",
        }
    }
}

impl fmt::Display for EmploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmploymentStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employed" => Ok(EmploymentStatus::Employed),
            "self-employed" => Ok(EmploymentStatus::SelfEmployed),
            "business-owner" => Ok(EmploymentStatus::BusinessOwner),
            _ => Err(ParseError::new("employment status", s)),
        }
    }
}

/// Repayment terms offered on the application, in months.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub enum LoanTerm {
    #[default]
    Months12,
    Months24,
    Months36,
    Months48,
    Months60,
}

impl LoanTerm {
    pub const ALL: [LoanTerm; 5] = [
        LoanTerm::Months12,
        LoanTerm::Months24,
        LoanTerm::Months36,
        LoanTerm::Months48,
        LoanTerm::Months60,
    ];

    pub fn months(&self) -> u32 {
        match self {
            LoanTerm::Months12 => 12,
            LoanTerm::Months24 => 24,
            LoanTerm::Months36 => 36,
            LoanTerm::Months48 => 48,
            LoanTerm::Months60 => 60,
        }
    }
}

impl From<LoanTerm> for u32 {
    fn from(term: LoanTerm) -> Self {
        term.months()
    }
}

impl TryFrom<u32> for LoanTerm {
    type Error = ParseError;

    fn try_from(months: u32) -> Result<Self, Self::Error> {
        LoanTerm::ALL
            .into_iter()
            .find(|t| t.months() == months)
            .ok_or_else(|| ParseError::new("loan term", &months.to_string()))
    }
}

impl fmt::Display for LoanTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.months())
    }
}

impl FromStr for LoanTerm {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map_err(|_| ParseError::new("loan term", s))
            .and_then(LoanTerm::try_from)
    }
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LoanApplication {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub amount: f64,
    pub purpose: LoanPurpose,
    pub employment_status: EmploymentStatus,
    pub monthly_income: f64,
    pub credit_score: u32,
    pub term: LoanTerm,
}

impl Default for LoanApplication {
    // the form's initial state
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            amount: 10_000.,
            purpose: LoanPurpose::default(),
            employment_status: EmploymentStatus::default(),
            monthly_income: 0.,
            credit_score: 700,
            term: LoanTerm::default(),
        }
    }
}

impl LoanApplication {
    /// Applies the bounds the intake form enforces before submission.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        require("full name", &self.full_name)?;
        require("email", &self.email)?;
        if !is_email(&self.email) {
            return Err(ApplicationError::InvalidEmail {
                value: self.email.clone(),
            });
        }
        require("phone", &self.phone)?;

        if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&self.amount) {
            return Err(ApplicationError::AmountOutOfRange {
                amount: self.amount,
                min: MIN_AMOUNT,
                max: MAX_AMOUNT,
            });
        }
        if !(self.monthly_income.is_finite() && self.monthly_income >= 0.) {
            return Err(ApplicationError::InvalidIncome {
                income: self.monthly_income,
            });
        }
        if !(LOWEST_CREDIT_SCORE..=HIGHEST_CREDIT_SCORE).contains(&self.credit_score) {
            return Err(ApplicationError::CreditScoreOutOfRange {
                score: self.credit_score,
                min: LOWEST_CREDIT_SCORE,
                max: HIGHEST_CREDIT_SCORE,
            });
        }
        Ok(())
    }

    pub fn assess(&self, policy: &EligibilityPolicy) -> Assessment {
        policy.assess(
            self.amount,
            self.term.months(),
            self.monthly_income,
            self.credit_score,
        )
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ApplicationError> {
    if value.trim().is_empty() {
        Err(ApplicationError::MissingField { field })
    } else {
        Ok(())
    }
}

fn is_email(value: &str) -> bool {
    match value.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.trim().contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Decision shown to the applicant after submitting.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Submission {
    pub eligible: bool,
    pub assessment: Assessment,
}

impl Submission {
    pub fn message(&self) -> &'static str {
        if self.eligible {
            APPROVED_MESSAGE
        } else {
            DECLINED_MESSAGE
        }
    }
}

impl fmt::Display for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Validates `application` and decides eligibility under `policy`.
///
/// An eligible application is recorded in the log; nothing is sent anywhere.
pub fn submit(
    application: &LoanApplication,
    policy: &EligibilityPolicy,
) -> Result<Submission, ApplicationError> {
    application.validate()?;

    let assessment = application.assess(policy);
    let eligible = assessment.is_eligible();
    if eligible {
        info!("loan application submitted: {:?}", application);
    }

    Ok(Submission {
        eligible,
        assessment,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        submit, EmploymentStatus, LoanApplication, LoanPurpose, LoanTerm, APPROVED_MESSAGE,
        DECLINED_MESSAGE,
    };
    use crate::eligibility::EligibilityPolicy;
    use crate::error::{ApplicationError, ParseError};
    use test_log::test;

    fn applicant() -> LoanApplication {
        LoanApplication {
            full_name: "Jordan Reyes".to_string(),
            email: "jordan@example.com".to_string(),
            phone: "555-0134".to_string(),
            amount: 10_000.,
            purpose: LoanPurpose::Education,
            employment_status: EmploymentStatus::Employed,
            monthly_income: 3_000.,
            credit_score: 700,
            term: LoanTerm::Months12,
        }
    }

    #[test]
    fn test_parse_form_values() {
        assert_eq!(
            "debt-consolidation".parse::<LoanPurpose>(),
            Ok(LoanPurpose::DebtConsolidation)
        );
        assert_eq!(
            "self-employed".parse::<EmploymentStatus>(),
            Ok(EmploymentStatus::SelfEmployed)
        );
        assert_eq!("48".parse::<LoanTerm>(), Ok(LoanTerm::Months48));
        assert_eq!(
            "18".parse::<LoanTerm>(),
            Err(ParseError {
                kind: "loan term",
                value: "18".to_string()
            })
        );
        assert!("Personal".parse::<LoanPurpose>().is_err());
        assert!("retired".parse::<EmploymentStatus>().is_err());

        for purpose in ["personal", "business", "education", "debt-consolidation"] {
            assert_eq!(purpose.parse::<LoanPurpose>().unwrap().to_string(), purpose);
        }
        for term in LoanTerm::ALL {
            assert_eq!(LoanTerm::try_from(u32::from(term)), Ok(term));
        }
    }

    #[test]
    fn test_default_matches_form() {
        let form = LoanApplication::default();
        assert_eq!(form.amount, 10_000.);
        assert_eq!(form.term.months(), 12);
        assert_eq!(form.credit_score, 700);
        assert_eq!(form.monthly_income, 0.);
        assert_eq!(
            form.validate(),
            Err(ApplicationError::MissingField { field: "full name" })
        );
    }

    #[test]
    fn test_validate() {
        assert_eq!(applicant().validate(), Ok(()));

        let mut app = applicant();
        app.phone = "   ".to_string();
        assert_eq!(
            app.validate(),
            Err(ApplicationError::MissingField { field: "phone" })
        );

        let mut app = applicant();
        app.email = "jordan.example.com".to_string();
        assert!(matches!(
            app.validate(),
            Err(ApplicationError::InvalidEmail { .. })
        ));
        app.email = "jordan@".to_string();
        assert!(app.validate().is_err());

        let mut app = applicant();
        app.amount = 999.;
        assert!(matches!(
            app.validate(),
            Err(ApplicationError::AmountOutOfRange { .. })
        ));
        app.amount = 100_001.;
        assert!(app.validate().is_err());
        app.amount = 100_000.;
        assert!(app.validate().is_ok());

        let mut app = applicant();
        app.monthly_income = -1.;
        assert!(matches!(
            app.validate(),
            Err(ApplicationError::InvalidIncome { .. })
        ));

        let mut app = applicant();
        app.credit_score = 851;
        assert_eq!(
            app.validate(),
            Err(ApplicationError::CreditScoreOutOfRange {
                score: 851,
                min: 300,
                max: 850
            })
        );
    }

    #[test]
    fn test_submit() {
        let policy = EligibilityPolicy::default();

        let approved = submit(&applicant(), &policy).unwrap();
        assert!(approved.eligible);
        assert_eq!(approved.message(), APPROVED_MESSAGE);

        let mut app = applicant();
        app.credit_score = 600;
        let declined = submit(&app, &policy).unwrap();
        assert!(!declined.eligible);
        assert!(!declined.assessment.credit_score_ok);
        assert_eq!(declined.to_string(), DECLINED_MESSAGE);

        // zero income passes the form but never qualifies
        let mut app = applicant();
        app.monthly_income = 0.;
        let declined = submit(&app, &policy).unwrap();
        assert!(!declined.eligible);
        assert_eq!(declined.assessment.debt_to_income, None);
    }

    #[test]
    fn test_submit_longer_term_lowers_ratio() {
        let policy = EligibilityPolicy::default();
        let mut app = applicant();
        app.amount = 50_000.;
        app.monthly_income = 2_000.;
        assert!(!submit(&app, &policy).unwrap().eligible);

        // 50000 / 60 / 2000 = 0.4167
        app.term = LoanTerm::Months60;
        assert!(submit(&app, &policy).unwrap().eligible);
    }
}
