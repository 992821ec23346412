//! Month-by-month amortisation table for a level-payment loan.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::scenario::{LoanScenario, MAX_AMOUNT, MAX_TERM_YEARS};
use crate::error::MortgageCalcError;
use crate::time_value::{level_payment, monthly_rate_from_percent, months_in_term};
use crate::types::{round_cents, with_metadata, ComputationOutput, Money, Percent};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub loan_amount: Money,
    /// Annual note rate in percent. Zero is allowed here.
    pub annual_interest_rate_percent: Percent,
    pub term_years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    /// Balance after this payment.
    pub balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: u32,
    pub principal: Money,
    pub interest: Money,
    pub ending_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// Scheduled level payment, rounded to cents.
    pub monthly_payment: Money,
    pub number_of_payments: u32,
    pub total_interest: Money,
    pub total_paid: Money,
    pub rows: Vec<ScheduleRow>,
    pub yearly: Vec<YearSummary>,
}

impl LoanScenario {
    /// Schedule input for the loan this scenario finances.
    pub fn schedule_input(&self) -> ScheduleInput {
        ScheduleInput {
            loan_amount: self.loan_amount(),
            annual_interest_rate_percent: self.annual_interest_rate_percent,
            term_years: self.term_years,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the amortisation table.
///
/// Payments are rounded to cents as a servicer would bill them; the last
/// payment absorbs the accumulated rounding so the balance closes at zero.
pub fn amortization_schedule(
    input: &ScheduleInput,
) -> MortgageResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    validate_schedule(input)?;

    let nper = months_in_term(input.term_years);
    let monthly_rate = monthly_rate_from_percent(input.annual_interest_rate_percent);
    let payment = round_cents(level_payment(monthly_rate, nper, input.loan_amount)?);

    let mut rows = Vec::with_capacity(nper as usize);
    let mut yearly = Vec::with_capacity(input.term_years as usize);
    let mut balance = input.loan_amount;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;
    let mut year_principal = Decimal::ZERO;
    let mut year_interest = Decimal::ZERO;

    let overflow = || MortgageCalcError::overflow("amortisation schedule totals");
    for month in 1..=nper {
        let interest = round_cents(balance.checked_mul(monthly_rate).ok_or_else(overflow)?);
        let mut principal = payment - interest;
        if month == nper || principal > balance {
            principal = balance;
        }
        let this_payment = principal.checked_add(interest).ok_or_else(overflow)?;
        balance -= principal;

        total_interest = total_interest.checked_add(interest).ok_or_else(overflow)?;
        total_paid = total_paid.checked_add(this_payment).ok_or_else(overflow)?;
        year_principal = year_principal.checked_add(principal).ok_or_else(overflow)?;
        year_interest = year_interest.checked_add(interest).ok_or_else(overflow)?;

        rows.push(ScheduleRow {
            month,
            payment: this_payment,
            principal,
            interest,
            balance,
        });

        if month % 12 == 0 || month == nper {
            yearly.push(YearSummary {
                year: month.div_ceil(12),
                principal: year_principal,
                interest: year_interest,
                ending_balance: balance,
            });
            year_principal = Decimal::ZERO;
            year_interest = Decimal::ZERO;
        }
    }

    debug!(nper, %payment, %total_interest, "built amortisation schedule");

    let mut warnings = Vec::new();
    if let Some(last) = rows.last() {
        if (last.payment - payment).abs() > payment / Decimal::from(100) {
            warnings.push(format!(
                "Final payment {} differs from the level payment {} by more than 1%",
                last.payment, payment
            ));
        }
    }

    let output = AmortizationSchedule {
        monthly_payment: payment,
        number_of_payments: nper,
        total_interest,
        total_paid,
        rows,
        yearly,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortisation schedule (cent-rounded)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_schedule(input: &ScheduleInput) -> MortgageResult<()> {
    if input.loan_amount < Decimal::ZERO {
        return Err(MortgageCalcError::invalid(
            "loan_amount",
            "Loan amount cannot be negative",
        ));
    }
    if input.loan_amount > MAX_AMOUNT {
        return Err(MortgageCalcError::invalid(
            "loan_amount",
            format!("Loan amount cannot exceed {MAX_AMOUNT}"),
        ));
    }
    if input.annual_interest_rate_percent < Decimal::ZERO {
        return Err(MortgageCalcError::invalid(
            "annual_interest_rate_percent",
            "Interest rate cannot be negative",
        ));
    }
    if input.term_years == 0 || input.term_years > MAX_TERM_YEARS {
        return Err(MortgageCalcError::invalid(
            "term_years",
            format!("Term must be between 1 and {MAX_TERM_YEARS} years"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn standard_input() -> ScheduleInput {
        ScheduleInput {
            loan_amount: dec!(240_000),
            annual_interest_rate_percent: dec!(5.25),
            term_years: 30,
        }
    }

    fn run(input: &ScheduleInput) -> AmortizationSchedule {
        amortization_schedule(input).unwrap().result
    }

    #[test]
    fn test_principal_reconstructs_loan_amount() {
        let out = run(&standard_input());
        let principal: Decimal = out.rows.iter().map(|r| r.principal).sum();
        assert_eq!(principal, dec!(240_000));
        assert_eq!(out.rows.last().unwrap().balance, Decimal::ZERO);
    }

    #[test]
    fn test_row_and_year_counts() {
        let out = run(&standard_input());
        assert_eq!(out.rows.len(), 360);
        assert_eq!(out.yearly.len(), 30);
        assert_eq!(out.yearly[29].ending_balance, Decimal::ZERO);
    }

    #[test]
    fn test_payment_matches_formula() {
        let out = run(&standard_input());
        assert_eq!(out.monthly_payment, dec!(1325.29));
        assert_eq!(out.rows[0].interest, dec!(1050));
        assert_eq!(out.rows[0].principal, dec!(275.29));
    }

    #[test]
    fn test_totals_consistent() {
        let out = run(&standard_input());
        assert_eq!(out.total_paid, out.total_interest + dec!(240_000));
        let yearly_interest: Decimal = out.yearly.iter().map(|y| y.interest).sum();
        assert_eq!(yearly_interest, out.total_interest);
    }

    #[test]
    fn test_final_payment_close_to_level() {
        let out = amortization_schedule(&standard_input()).unwrap();
        assert!(out.warnings.is_empty());
        let last = out.result.rows.last().unwrap();
        assert!((last.payment - out.result.monthly_payment).abs() < dec!(1));
    }

    #[test]
    fn test_zero_rate_straight_line() {
        let input = ScheduleInput {
            loan_amount: dec!(12_000),
            annual_interest_rate_percent: Decimal::ZERO,
            term_years: 1,
        };
        let out = run(&input);
        assert_eq!(out.monthly_payment, dec!(1000));
        assert_eq!(out.total_interest, Decimal::ZERO);
        assert!(out.rows.iter().all(|r| r.principal == dec!(1000)));
    }

    #[test]
    fn test_balance_never_increases() {
        let out = run(&standard_input());
        for pair in out.rows.windows(2) {
            assert!(pair[1].balance <= pair[0].balance);
        }
    }

    #[test]
    fn test_from_scenario() {
        let input = LoanScenario::default().schedule_input();
        assert_eq!(input.loan_amount, dec!(240_000));
        assert_eq!(input.term_years, 30);
    }

    #[test]
    fn test_rejects_bad_term() {
        let input = ScheduleInput {
            term_years: 0,
            ..standard_input()
        };
        assert!(amortization_schedule(&input).is_err());
    }
}
