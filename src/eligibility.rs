use log::{debug, warn};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const MIN_CREDIT_SCORE: u32 = 650;
pub const MAX_DEBT_TO_INCOME: f64 = 0.43;

/// Thresholds an applicant must clear. Both rules apply.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EligibilityPolicy {
    pub min_credit_score: u32,
    pub max_debt_to_income: f64,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            min_credit_score: MIN_CREDIT_SCORE,
            max_debt_to_income: MAX_DEBT_TO_INCOME,
        }
    }
}

/// Outcome of each rule for one applicant, kept so a decline can be explained.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assessment {
    pub debt_to_income: Option<f64>,
    pub credit_score_ok: bool,
    pub debt_to_income_ok: bool,
}

impl Assessment {
    pub fn is_eligible(&self) -> bool {
        self.credit_score_ok && self.debt_to_income_ok
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.debt_to_income {
            Some(ratio) => write!(f, "debt-to-income {:.4}", ratio)?,
            None => write!(f, "debt-to-income undefined")?,
        }
        write!(
            f,
            ", credit score {}, ratio {}",
            if self.credit_score_ok { "ok" } else { "failed" },
            if self.debt_to_income_ok { "ok" } else { "failed" }
        )
    }
}

impl EligibilityPolicy {
    pub fn new(min_credit_score: u32, max_debt_to_income: f64) -> Self {
        Self {
            min_credit_score,
            max_debt_to_income,
        }
    }

    pub fn assess(
        &self,
        amount: f64,         // requested loan amount
        term: u32,           // term in months
        monthly_income: f64, // gross monthly income
        credit_score: u32,
    ) -> Assessment {
        let debt_to_income = debt_to_income_ratio(amount, term, monthly_income);
        let credit_score_ok = credit_score >= self.min_credit_score;
        // an undefined ratio never passes
        let debt_to_income_ok = debt_to_income.is_some_and(|r| r <= self.max_debt_to_income);

        debug!(
            "amount {}, term {}, income {}, score {}: ratio {:?}",
            amount, term, monthly_income, credit_score, debt_to_income
        );

        Assessment {
            debt_to_income,
            credit_score_ok,
            debt_to_income_ok,
        }
    }

    pub fn evaluate(&self, amount: f64, term: u32, monthly_income: f64, credit_score: u32) -> bool {
        self.assess(amount, term, monthly_income, credit_score)
            .is_eligible()
    }
}

/// Monthly obligation `amount / term` over `monthly_income`.
///
/// Returns `None` when the ratio has no meaning: a zero term, an amount or
/// income that is zero, negative, or not finite.
pub fn debt_to_income_ratio(amount: f64, term: u32, monthly_income: f64) -> Option<f64> {
    if !(amount.is_finite() && amount > 0.) {
        warn!("loan amount {} leaves debt-to-income ratio undefined", amount);
        return None;
    }
    if term == 0 {
        warn!("zero loan term, debt-to-income ratio undefined");
        return None;
    }
    if !(monthly_income.is_finite() && monthly_income > 0.) {
        warn!(
            "monthly income {} leaves debt-to-income ratio undefined",
            monthly_income
        );
        return None;
    }
    let ratio = (amount / term as f64) / monthly_income;
    ratio.is_finite().then_some(ratio)
}

/// Eligibility under the default policy: credit score at least 650 and a
/// debt-to-income ratio no higher than 0.43.
pub fn evaluate(amount: f64, term: u32, monthly_income: f64, credit_score: u32) -> bool {
    EligibilityPolicy::default().evaluate(amount, term, monthly_income, credit_score)
}
