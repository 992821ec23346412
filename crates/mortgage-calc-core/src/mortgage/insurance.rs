//! Recurring mortgage insurance (PMI, FHA MIP, USDA guarantee fee).
//!
//! Conventional PMI is priced from two ordered tables: the first credit tier
//! whose floor the score meets, then at most one LTV surcharge. The tables
//! are scanned top to bottom, so row order is the tie-break.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::scenario::LoanType;
use crate::types::{Money, Percent, Rate};

/// Conventional loans carry PMI only above this LTV (exclusive).
pub const PMI_LTV_THRESHOLD: Decimal = dec!(80);

/// Rate used when the score clears none of the credit tiers.
const PMI_BASE_RATE: Rate = dec!(0.005);

/// (minimum credit score, annual PMI rate), best tier first.
const PMI_CREDIT_TIERS: [(u32, Rate); 5] = [
    (760, dec!(0.0025)),
    (740, dec!(0.0030)),
    (720, dec!(0.0035)),
    (700, dec!(0.0040)),
    (680, dec!(0.0045)),
];

/// (LTV strictly above, surcharge added to the tier rate), highest first.
const PMI_LTV_SURCHARGES: [(Decimal, Rate); 2] = [(dec!(95), dec!(0.0010)), (dec!(90), dec!(0.0005))];

const FHA_ANNUAL_MIP: Rate = dec!(0.0055);
const USDA_ANNUAL_GUARANTEE_FEE: Rate = dec!(0.0035);

/// Which recurring charge applies to the loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceKind {
    /// Private mortgage insurance on a conventional loan.
    Pmi,
    /// FHA annual mortgage insurance premium.
    Mip,
    /// USDA annual guarantee fee.
    GuaranteeFee,
    None,
}

impl std::fmt::Display for InsuranceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pmi => "PMI",
            Self::Mip => "MIP",
            Self::GuaranteeFee => "Guarantee Fee",
            Self::None => "None",
        };
        write!(f, "{s}")
    }
}

/// Annual rate and the monthly charge it produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceQuote {
    pub kind: InsuranceKind,
    /// Annual premium as a decimal of the loan amount (0.004 = 0.40%).
    pub annual_rate: Rate,
    /// Unrounded monthly premium.
    pub monthly_premium: Money,
}

impl InsuranceQuote {
    fn none() -> Self {
        Self {
            kind: InsuranceKind::None,
            annual_rate: Decimal::ZERO,
            monthly_premium: Decimal::ZERO,
        }
    }

    fn annual(kind: InsuranceKind, annual_rate: Rate, loan_amount: Money) -> Self {
        Self {
            kind,
            annual_rate,
            monthly_premium: loan_amount * annual_rate / dec!(12),
        }
    }
}

/// True when pricing this loan will consult the credit-score tiers.
pub fn requires_credit_tier(loan_type: LoanType, ltv_percent: Percent) -> bool {
    loan_type == LoanType::Conventional && ltv_percent > PMI_LTV_THRESHOLD
}

/// Price the recurring insurance component for a loan.
pub fn quote_mortgage_insurance(
    loan_type: LoanType,
    loan_amount: Money,
    ltv_percent: Percent,
    credit_score: u32,
) -> InsuranceQuote {
    match loan_type {
        LoanType::Conventional if ltv_percent > PMI_LTV_THRESHOLD => InsuranceQuote::annual(
            InsuranceKind::Pmi,
            conventional_pmi_rate(ltv_percent, credit_score),
            loan_amount,
        ),
        LoanType::Conventional => InsuranceQuote::none(),
        LoanType::Fha => InsuranceQuote::annual(InsuranceKind::Mip, FHA_ANNUAL_MIP, loan_amount),
        LoanType::Usda => InsuranceQuote::annual(
            InsuranceKind::GuaranteeFee,
            USDA_ANNUAL_GUARANTEE_FEE,
            loan_amount,
        ),
        // VA's one-time funding fee is not a monthly charge.
        LoanType::Va | LoanType::Jumbo => InsuranceQuote::none(),
    }
}

/// Annual PMI rate: one credit tier plus at most one LTV surcharge.
pub fn conventional_pmi_rate(ltv_percent: Percent, credit_score: u32) -> Rate {
    let tier_rate = PMI_CREDIT_TIERS
        .iter()
        .find(|(min_score, _)| credit_score >= *min_score)
        .map(|(_, rate)| *rate)
        .unwrap_or(PMI_BASE_RATE);

    let surcharge = PMI_LTV_SURCHARGES
        .iter()
        .find(|(above, _)| ltv_percent > *above)
        .map(|(_, add)| *add)
        .unwrap_or(Decimal::ZERO);

    tier_rate + surcharge
}
