use chrono::{Months, NaiveDate};
use log::{debug, trace, warn};
use std::fmt;

use crate::error::CalculatorError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 8.9% APR, the rate quoted by the calculator.
pub const DEFAULT_ANNUAL_RATE: f64 = 0.089;

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AmortizationResult {
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
    pub interest_rate: f64,
}

impl AmortizationResult {
    pub fn rounded_monthly_payment(&self) -> f64 {
        round(self.monthly_payment, 2)
    }

    pub fn rounded_total_payment(&self) -> f64 {
        round(self.total_payment, 2)
    }

    pub fn rounded_total_interest(&self) -> f64 {
        round(self.total_interest, 2)
    }

    /// The rate as a percentage to one decimal place, e.g. `8.9`.
    pub fn rounded_rate_percent(&self) -> f64 {
        round(self.interest_rate * 100., 1)
    }
}

impl fmt::Display for AmortizationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Monthly Payment: ${:.2}", self.monthly_payment)?;
        writeln!(f, "Total Payment: ${:.2}", self.total_payment)?;
        writeln!(f, "Total Interest: ${:.2}", self.total_interest)?;
        write!(f, "Interest Rate: {:.1}% APR", self.interest_rate * 100.)
    }
}

fn round(amt: f64, dec: i32) -> f64 {
    if amt == 0. {
        0.
    } else {
        (amt * 10_f64.powi(dec)).round() / 10_f64.powi(dec)
    }
}

fn check_inputs(principal: f64, term_months: u32, annual_rate: f64) -> Result<(), CalculatorError> {
    if term_months == 0 {
        warn!("rejected calculation with zero-month term");
        return Err(CalculatorError::ZeroTerm);
    }
    if !(principal.is_finite() && principal > 0.) {
        return Err(CalculatorError::InvalidPrincipal { principal });
    }
    if !(annual_rate.is_finite() && annual_rate >= 0.) {
        return Err(CalculatorError::InvalidRate { rate: annual_rate });
    }
    Ok(())
}

// level payment for a fixed monthly rate; a zero rate spreads principal evenly
fn get_pmt_amount(principal: f64, term_months: u32, monthly_rate: f64) -> f64 {
    if monthly_rate == 0. {
        return principal / term_months as f64;
    }
    // P * r / (1 - (1 + r)^-n), through logs so long terms and tiny rates stay finite
    let growth = term_months as f64 * monthly_rate.ln_1p();
    (principal * monthly_rate) / -(-growth).exp_m1()
}

fn non_finite(principal: f64, term_months: u32, annual_rate: f64) -> CalculatorError {
    warn!(
        "principal {}, {} months at {} has no finite payment",
        principal, term_months, annual_rate
    );
    CalculatorError::NonFiniteResult {
        principal,
        term_months,
        annual_rate,
    }
}

/// Fixed-rate monthly payment, total paid, and total interest.
///
/// `annual_rate` is a decimal (`0.089` for 8.9%). Values keep full
/// precision; round only for display.
pub fn calculate(
    principal: f64,
    term_months: u32,
    annual_rate: f64,
) -> Result<AmortizationResult, CalculatorError> {
    check_inputs(principal, term_months, annual_rate)?;

    let monthly_payment = get_pmt_amount(principal, term_months, annual_rate / 12.);
    let total_payment = monthly_payment * term_months as f64;
    let total_interest = total_payment - principal;
    if !(monthly_payment.is_finite() && total_payment.is_finite() && total_interest.is_finite()) {
        return Err(non_finite(principal, term_months, annual_rate));
    }

    debug!(
        "principal {}, {} months at {}: payment {}",
        principal, term_months, annual_rate, monthly_payment
    );

    Ok(AmortizationResult {
        monthly_payment,
        total_payment,
        total_interest,
        interest_rate: annual_rate,
    })
}

/// [`calculate`] at [`DEFAULT_ANNUAL_RATE`].
pub fn calculate_default(
    principal: f64,
    term_months: u32,
) -> Result<AmortizationResult, CalculatorError> {
    calculate(principal, term_months, DEFAULT_ANNUAL_RATE)
}

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduledPayment {
    pub pmt_number: u32,
    pub pmt_date: NaiveDate,
    pub pmt_amount: f64,
    pub interest_paid: f64,
    pub principal_paid: f64,
    pub end_balance: f64,
}

impl fmt::Display for ScheduledPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pmt number {}, date {}, payment ${:.2}, interest paid ${:.2}, principal paid ${:.2}, ending balance ${:.2}",
            self.pmt_number,
            self.pmt_date,
            self.pmt_amount,
            self.interest_paid,
            self.principal_paid,
            self.end_balance
        )
    }
}

/// Month-by-month breakdown of a fixed-rate loan.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AmortizationSchedule {
    pub principal: f64,
    pub term_months: u32,
    pub annual_rate: f64,
    pub first_pmt_date: NaiveDate,
    payments: Vec<ScheduledPayment>,
}

impl AmortizationSchedule {
    pub fn generate(
        principal: f64,
        term_months: u32,
        annual_rate: f64,
        first_pmt_date: NaiveDate,
    ) -> Result<Self, CalculatorError> {
        check_inputs(principal, term_months, annual_rate)?;

        let monthly_rate = annual_rate / 12.;
        let pmt_amount = get_pmt_amount(principal, term_months, monthly_rate);
        if !pmt_amount.is_finite() {
            return Err(non_finite(principal, term_months, annual_rate));
        }
        let mut payments = Vec::with_capacity(term_months as usize);
        let mut begin_balance = principal;

        for pmt_number in 1..=term_months {
            let pmt_date = first_pmt_date
                .checked_add_months(Months::new(pmt_number - 1))
                .ok_or(CalculatorError::DateOutOfRange {
                    start: first_pmt_date,
                    months: pmt_number - 1,
                })?;
            let interest = begin_balance * monthly_rate;

            // the final payment clears whatever rounding left behind
            let (amount, end_balance) = if pmt_number == term_months {
                (begin_balance + interest, 0.)
            } else {
                (pmt_amount, begin_balance - (pmt_amount - interest))
            };
            if !(amount.is_finite() && interest.is_finite() && end_balance.is_finite()) {
                return Err(non_finite(principal, term_months, annual_rate));
            }
            trace!(
                "pmt # {}, date {}, interest {}, end bal {}",
                pmt_number,
                pmt_date,
                interest,
                end_balance
            );

            payments.push(ScheduledPayment {
                pmt_number,
                pmt_date,
                pmt_amount: amount,
                interest_paid: interest,
                principal_paid: amount - interest,
                end_balance,
            });
            begin_balance = end_balance;
        }

        Ok(Self {
            principal,
            term_months,
            annual_rate,
            first_pmt_date,
            payments,
        })
    }

    pub fn payments(&self) -> &[ScheduledPayment] {
        &self.payments
    }

    /// Payment by its 1-based number.
    pub fn get_pmt_detail(&self, pmt_number: u32) -> Option<&ScheduledPayment> {
        let idx = pmt_number.checked_sub(1)?;
        self.payments.get(idx as usize)
    }

    pub fn total_payment(&self) -> f64 {
        self.payments.iter().map(|p| p.pmt_amount).sum()
    }

    pub fn total_interest(&self) -> f64 {
        self.payments.iter().map(|p| p.interest_paid).sum()
    }
}

impl fmt::Display for AmortizationSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pmt in &self.payments {
            writeln!(f, "{}", pmt)?;
        }
        Ok(())
    }
}
