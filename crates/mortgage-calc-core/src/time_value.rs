use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::MortgageCalcError;
use crate::types::{Money, Percent, Rate};
use crate::MortgageResult;

const MONTHS_PER_YEAR: u32 = 12;

/// Convert an annual rate quoted in percent (5.25) to a monthly decimal rate.
pub fn monthly_rate_from_percent(annual_percent: Percent) -> Rate {
    annual_percent / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
}

/// Number of monthly payments over a term in years.
pub fn months_in_term(term_years: u32) -> u32 {
    term_years.saturating_mul(MONTHS_PER_YEAR)
}

/// (1 + rate)^nper, erroring instead of wrapping when it leaves decimal range.
pub fn compound_factor(rate: Rate, nper: u32) -> MortgageResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powu(u64::from(nper))
        .ok_or_else(|| MortgageCalcError::overflow(format!("compound factor (1 + {rate})^{nper}")))
}

/// Level payment that fully amortises `principal` over `nper` periods.
///
/// Returned as a positive amount. With a zero rate the principal is simply
/// spread evenly across the periods. Evaluated as `P·r / (1 − (1+r)^−n)` so
/// the intermediate never exceeds the payment itself.
pub fn level_payment(rate: Rate, nper: u32, principal: Money) -> MortgageResult<Money> {
    if nper == 0 {
        return Err(MortgageCalcError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }
    if rate < Decimal::ZERO {
        return Err(MortgageCalcError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate cannot be negative".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let factor = compound_factor(rate, nper)?;
    let discount = Decimal::ONE
        .checked_div(factor)
        .ok_or_else(|| MortgageCalcError::overflow("level payment discount factor"))?;
    let denom = Decimal::ONE - discount;

    if denom.is_zero() {
        return Err(MortgageCalcError::DivisionByZero {
            context: "level payment annuity factor".into(),
        });
    }

    principal
        .checked_mul(rate)
        .and_then(|interest| interest.checked_div(denom))
        .ok_or_else(|| MortgageCalcError::overflow(format!("level payment on {principal}")))
}
