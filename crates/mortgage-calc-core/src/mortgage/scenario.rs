use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MortgageCalcError;
use crate::types::{Money, Percent};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Credit score bounds accepted by the insurance tier lookup.
pub const MIN_CREDIT_SCORE: u32 = 300;
pub const MAX_CREDIT_SCORE: u32 = 850;

/// Longest term accepted; keeps (1 + r)^n well inside decimal range.
pub const MAX_TERM_YEARS: u32 = 50;

/// Ceiling on any single money input. Keeps every intermediate of the
/// payment and schedule arithmetic far inside the 96-bit decimal range.
pub const MAX_AMOUNT: Decimal = dec!(1_000_000_000_000_000);

/// Highest annual rate accepted, in percent.
const MAX_RATE_PERCENT: Decimal = dec!(100);

/// Below this the price is accepted but flagged as unusual.
const SOFT_MIN_HOME_PRICE: Decimal = dec!(50_000);

/// Above this the rate is accepted but flagged as unusual.
const SOFT_MAX_RATE_PERCENT: Decimal = dec!(20);

/// Share of the price suggested as a down payment.
const DEFAULT_DOWN_PAYMENT_SHARE: Decimal = dec!(0.20);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Loan product family. Drives the mortgage insurance policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanType {
    #[default]
    Conventional,
    Fha,
    Va,
    Jumbo,
    Usda,
}

impl LoanType {
    pub const ALL: [LoanType; 5] = [
        LoanType::Conventional,
        LoanType::Fha,
        LoanType::Va,
        LoanType::Jumbo,
        LoanType::Usda,
    ];
}

impl std::fmt::Display for LoanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Conventional => "Conventional",
            Self::Fha => "FHA",
            Self::Va => "VA",
            Self::Jumbo => "Jumbo",
            Self::Usda => "USDA",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for LoanType {
    type Err = MortgageCalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "conventional" => Ok(Self::Conventional),
            "fha" => Ok(Self::Fha),
            "va" => Ok(Self::Va),
            "jumbo" => Ok(Self::Jumbo),
            "usda" => Ok(Self::Usda),
            other => Err(MortgageCalcError::invalid(
                "loan_type",
                format!("Unknown loan type '{other}' (expected conventional, fha, va, jumbo or usda)"),
            )),
        }
    }
}

/// A single home purchase to price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanScenario {
    /// Purchase price of the home.
    pub home_price: Money,
    /// Cash paid up front.
    pub down_payment: Money,
    /// Annual note rate in percent (5.25 = 5.25%).
    pub annual_interest_rate_percent: Percent,
    /// Loan term in years.
    pub term_years: u32,
    pub loan_type: LoanType,
    /// FICO-style score, 300-850.
    pub credit_score: u32,
    #[serde(default)]
    pub annual_property_tax: Money,
    #[serde(default)]
    pub annual_home_insurance: Money,
    /// HOA dues, already monthly.
    #[serde(default)]
    pub monthly_hoa: Money,
}

impl Default for LoanScenario {
    fn default() -> Self {
        Self {
            home_price: dec!(300_000),
            down_payment: dec!(60_000),
            annual_interest_rate_percent: dec!(5.25),
            term_years: 30,
            loan_type: LoanType::Conventional,
            credit_score: 700,
            annual_property_tax: dec!(3_000),
            annual_home_insurance: dec!(1_200),
            monthly_hoa: Decimal::ZERO,
        }
    }
}

impl LoanScenario {
    /// Saturates on unvalidated extremes instead of overflowing.
    pub fn loan_amount(&self) -> Money {
        self.home_price.saturating_sub(self.down_payment)
    }

    /// Loan-to-value in percent. Zero when the price is not positive.
    pub fn loan_to_value_percent(&self) -> Percent {
        share_of_price(self.loan_amount(), self.home_price)
    }

    pub fn down_payment_percent(&self) -> Percent {
        share_of_price(self.down_payment, self.home_price)
    }

    /// Replace the price and re-derive the suggested down payment.
    pub fn with_home_price(mut self, home_price: Money) -> Self {
        self.home_price = home_price;
        self.down_payment = default_down_payment(home_price);
        self
    }
}

fn share_of_price(part: Money, price: Money) -> Percent {
    if price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let saturated = if part.is_sign_negative() { Decimal::MIN } else { Decimal::MAX };
    part.checked_div(price)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .unwrap_or(saturated)
}

/// Suggested down payment: 20% of the price, rounded to whole dollars.
pub fn default_down_payment(home_price: Money) -> Money {
    (home_price * DEFAULT_DOWN_PAYMENT_SHARE)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Hard checks. Any failure aborts the calculation.
///
/// `needs_credit_tier` is true when the insurance policy will look up a
/// credit-score tier; only then is the score range enforced.
pub fn validate_scenario(scenario: &LoanScenario, needs_credit_tier: bool) -> MortgageResult<()> {
    if scenario.home_price <= Decimal::ZERO {
        return Err(MortgageCalcError::invalid(
            "home_price",
            "Home price must be positive",
        ));
    }
    if scenario.home_price > MAX_AMOUNT {
        return Err(MortgageCalcError::invalid(
            "home_price",
            format!("Home price cannot exceed {MAX_AMOUNT}"),
        ));
    }
    if scenario.down_payment < Decimal::ZERO {
        return Err(MortgageCalcError::invalid(
            "down_payment",
            "Down payment cannot be negative",
        ));
    }
    if scenario.down_payment > scenario.home_price {
        return Err(MortgageCalcError::invalid(
            "down_payment",
            "Down payment exceeds home price",
        ));
    }
    if scenario.annual_interest_rate_percent <= Decimal::ZERO {
        return Err(MortgageCalcError::invalid(
            "annual_interest_rate_percent",
            "Interest rate must be greater than zero",
        ));
    }
    if scenario.annual_interest_rate_percent > MAX_RATE_PERCENT {
        return Err(MortgageCalcError::invalid(
            "annual_interest_rate_percent",
            "Interest rate cannot exceed 100%",
        ));
    }
    if scenario.term_years == 0 {
        return Err(MortgageCalcError::invalid(
            "term_years",
            "Term must be at least one year",
        ));
    }
    if scenario.term_years > MAX_TERM_YEARS {
        return Err(MortgageCalcError::invalid(
            "term_years",
            format!("Term cannot exceed {MAX_TERM_YEARS} years"),
        ));
    }
    if needs_credit_tier && !credit_score_in_range(scenario.credit_score) {
        return Err(MortgageCalcError::invalid(
            "credit_score",
            format!("Credit score must be between {MIN_CREDIT_SCORE} and {MAX_CREDIT_SCORE}"),
        ));
    }
    for (field, value) in [
        ("annual_property_tax", scenario.annual_property_tax),
        ("annual_home_insurance", scenario.annual_home_insurance),
        ("monthly_hoa", scenario.monthly_hoa),
    ] {
        if value < Decimal::ZERO {
            return Err(MortgageCalcError::invalid(field, "Amount cannot be negative"));
        }
        if value > MAX_AMOUNT {
            return Err(MortgageCalcError::invalid(
                field,
                format!("Amount cannot exceed {MAX_AMOUNT}"),
            ));
        }
    }
    Ok(())
}

/// Soft checks. Values that are legal but unusual enough to mention.
pub fn scenario_warnings(scenario: &LoanScenario, needs_credit_tier: bool) -> Vec<String> {
    let mut warnings = Vec::new();
    if scenario.home_price < SOFT_MIN_HOME_PRICE {
        warnings.push(format!(
            "Home price {} is below the usual minimum of {}",
            scenario.home_price, SOFT_MIN_HOME_PRICE
        ));
    }
    if scenario.annual_interest_rate_percent > SOFT_MAX_RATE_PERCENT {
        warnings.push(format!(
            "Interest rate {}% is unusually high",
            scenario.annual_interest_rate_percent
        ));
    }
    if !needs_credit_tier && !credit_score_in_range(scenario.credit_score) {
        warnings.push(format!(
            "Credit score {} is outside {}-{}; ignored for this loan",
            scenario.credit_score, MIN_CREDIT_SCORE, MAX_CREDIT_SCORE
        ));
    }
    warnings
}

fn credit_score_in_range(score: u32) -> bool {
    (MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&score)
}
