use anyhow::{Context, Result};
use chrono::{Local, Months, NaiveDate};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use smartloan::{
    amortization::{self, AmortizationSchedule, DEFAULT_ANNUAL_RATE},
    application::{submit, EmploymentStatus, LoanApplication, LoanPurpose, LoanTerm},
    eligibility::{EligibilityPolicy, MAX_DEBT_TO_INCOME, MIN_CREDIT_SCORE},
};
use std::fmt;

/// Smart Loan System - application intake and loan calculator
#[derive(Parser, Debug)]
#[command(name = "smartloan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print results as JSON (requires the `serde` feature)
    #[arg(long, global = true)]
    json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit a loan application and report eligibility
    Apply {
        /// Applicant's full name
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: String,

        /// Loan amount in dollars (1000-100000)
        #[arg(long, default_value_t = 10_000.)]
        amount: f64,

        /// personal, business, education or debt-consolidation
        #[arg(long, default_value = "personal")]
        purpose: LoanPurpose,

        /// employed, self-employed or business-owner
        #[arg(long, default_value = "employed")]
        employment: EmploymentStatus,

        /// Gross monthly income in dollars
        #[arg(long)]
        income: f64,

        /// Credit score (300-850)
        #[arg(long, default_value_t = 700)]
        credit_score: u32,

        /// Loan term in months: 12, 24, 36, 48 or 60
        #[arg(long, default_value = "12")]
        term: LoanTerm,

        /// Lowest credit score that qualifies
        #[arg(long, default_value_t = MIN_CREDIT_SCORE)]
        min_credit_score: u32,

        /// Highest debt-to-income ratio that qualifies
        #[arg(long, default_value_t = MAX_DEBT_TO_INCOME)]
        max_dti: f64,
    },

    /// Compute the monthly payment, total payment and total interest
    Calculate {
        /// Loan amount in dollars
        #[arg(long, default_value_t = 10_000.)]
        amount: f64,

        /// Loan term in months
        #[arg(long, default_value_t = 12)]
        term: u32,

        /// Annual rate as a decimal (0.089 is 8.9% APR)
        #[arg(long, default_value_t = DEFAULT_ANNUAL_RATE)]
        rate: f64,
    },

    /// Print the month-by-month repayment schedule
    Schedule {
        /// Loan amount in dollars
        #[arg(long, default_value_t = 10_000.)]
        amount: f64,

        /// Loan term in months
        #[arg(long, default_value_t = 12)]
        term: u32,

        /// Annual rate as a decimal (0.089 is 8.9% APR)
        #[arg(long, default_value_t = DEFAULT_ANNUAL_RATE)]
        rate: f64,

        /// Date of the first payment, YYYY-MM-DD (defaults to one month from today)
        #[arg(long)]
        first_payment: Option<NaiveDate>,
    },
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(feature = "serde")]
fn emit<T: fmt::Display + serde::Serialize>(json: bool, value: &T) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", value);
    }
    Ok(())
}

#[cfg(not(feature = "serde"))]
fn emit<T: fmt::Display>(json: bool, value: &T) -> Result<()> {
    if json {
        anyhow::bail!("JSON output requires the `serde` feature");
    }
    println!("{}", value);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    SimpleLogger::new()
        .with_level(log_level(cli.verbose))
        .init()?;

    match cli.command {
        Commands::Apply {
            name,
            email,
            phone,
            amount,
            purpose,
            employment,
            income,
            credit_score,
            term,
            min_credit_score,
            max_dti,
        } => {
            let application = LoanApplication {
                full_name: name,
                email,
                phone,
                amount,
                purpose,
                employment_status: employment,
                monthly_income: income,
                credit_score,
                term,
            };
            let policy = EligibilityPolicy::new(min_credit_score, max_dti);
            let submission = submit(&application, &policy).context("invalid application")?;

            emit(cli.json, &submission)?;
            if cli.verbose > 0 && !cli.json {
                println!("{}", submission.assessment);
            }
        }
        Commands::Calculate { amount, term, rate } => {
            let result = amortization::calculate(amount, term, rate)
                .context("cannot calculate loan payment")?;
            emit(cli.json, &result)?;
        }
        Commands::Schedule {
            amount,
            term,
            rate,
            first_payment,
        } => {
            let first_pmt_date = match first_payment {
                Some(date) => date,
                None => Local::now()
                    .date_naive()
                    .checked_add_months(Months::new(1))
                    .context("cannot derive first payment date from today")?,
            };
            let schedule = AmortizationSchedule::generate(amount, term, rate, first_pmt_date)
                .context("cannot build repayment schedule")?;
            emit(cli.json, &schedule)?;
        }
    }

    Ok(())
}

// verifies that types can implement the gated traits below
#[cfg(test)]
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<LoanApplication>();
    is_normal::<AmortizationSchedule>();
}

#[test]
fn verify_cli() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
