//! Monthly payment breakdown for a home purchase.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::insurance::{self, InsuranceKind};
use super::scenario::{self, LoanScenario};
use crate::error::MortgageCalcError;
use crate::time_value::{level_payment, monthly_rate_from_percent, months_in_term};
use crate::types::{round_cents, round_percent, with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One row of the payment pie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentLine {
    pub label: String,
    pub value: Money,
    /// Share of the total monthly payment, in percent.
    pub percentage: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub loan_amount: Money,
    pub down_payment_percent: Percent,
    /// Rounded to 2 dp for display. The insurance decision uses the unrounded
    /// ratio, so 80.00 here can still carry PMI when the true LTV is 80.003.
    pub loan_to_value_ratio: Percent,
    pub monthly_principal_and_interest: Money,
    pub monthly_property_tax: Money,
    pub monthly_home_insurance: Money,
    pub monthly_mortgage_insurance: Money,
    pub monthly_hoa: Money,
    pub total_monthly_payment: Money,
    pub mortgage_insurance_kind: InsuranceKind,
    /// Annual insurance rate as a decimal (0.004 = 0.40%).
    pub mortgage_insurance_annual_rate: Rate,
    pub number_of_payments: u32,
    pub payment_breakdown: Vec<PaymentLine>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Price a loan scenario into its monthly components.
pub fn calculate_payment(
    input: &LoanScenario,
) -> MortgageResult<ComputationOutput<PaymentBreakdown>> {
    let start = Instant::now();

    // Bounds first: the LTV below is only safe to compute on bounded amounts.
    scenario::validate_scenario(input, false)?;
    let ltv = input.loan_to_value_percent();
    let needs_tier = insurance::requires_credit_tier(input.loan_type, ltv);
    if needs_tier {
        scenario::validate_scenario(input, true)?;
    }

    let mut warnings = scenario::scenario_warnings(input, needs_tier);
    if needs_tier && round_percent(ltv) <= insurance::PMI_LTV_THRESHOLD {
        warnings.push(format!(
            "LTV {ltv:.4}% is just above {}%; PMI applies although the ratio displays as {}%",
            insurance::PMI_LTV_THRESHOLD,
            round_percent(ltv)
        ));
    }
    for w in &warnings {
        warn!(target: "mortgage_calc::calculator", "{w}");
    }

    let loan_amount = input.loan_amount();
    let nper = months_in_term(input.term_years);
    let monthly_rate = monthly_rate_from_percent(input.annual_interest_rate_percent);

    let principal_and_interest = level_payment(monthly_rate, nper, loan_amount)?;
    let property_tax = input.annual_property_tax / dec!(12);
    let home_insurance = input.annual_home_insurance / dec!(12);
    let hoa = input.monthly_hoa;
    let quote =
        insurance::quote_mortgage_insurance(input.loan_type, loan_amount, ltv, input.credit_score);

    let components = [
        ("Principal & Interest", principal_and_interest),
        ("Property Tax", property_tax),
        ("Home Insurance", home_insurance),
        ("PMI / MIP", quote.monthly_premium),
        ("HOA Fees", hoa),
    ];
    let total = components
        .iter()
        .try_fold(Decimal::ZERO, |acc, &(_, value)| acc.checked_add(value))
        .ok_or_else(|| MortgageCalcError::overflow("monthly payment total"))?;
    let payment_breakdown = components
        .iter()
        .map(|&(label, value)| PaymentLine {
            label: label.to_string(),
            value: round_cents(value),
            percentage: round_percent(share_of(value, total)),
        })
        .collect();

    debug!(
        loan_type = %input.loan_type,
        %loan_amount,
        %ltv,
        insurance = %quote.kind,
        %total,
        "computed monthly payment"
    );

    let output = PaymentBreakdown {
        loan_amount: round_cents(loan_amount),
        down_payment_percent: round_percent(input.down_payment_percent()),
        loan_to_value_ratio: round_percent(ltv),
        monthly_principal_and_interest: round_cents(principal_and_interest),
        monthly_property_tax: round_cents(property_tax),
        monthly_home_insurance: round_cents(home_insurance),
        monthly_mortgage_insurance: round_cents(quote.monthly_premium),
        monthly_hoa: round_cents(hoa),
        total_monthly_payment: round_cents(total),
        mortgage_insurance_kind: quote.kind,
        mortgage_insurance_annual_rate: quote.annual_rate,
        number_of_payments: nper,
        payment_breakdown,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortisation with escrow and mortgage insurance",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Component share of the total in percent; zero when nothing is owed.
fn share_of(component: Money, total: Money) -> Percent {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    component / total * dec!(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mortgage::scenario::LoanType;
    use rust_decimal_macros::dec;

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn run(input: &LoanScenario) -> PaymentBreakdown {
        calculate_payment(input).unwrap().result
    }

    #[test]
    fn test_default_scenario_payment() {
        let out = run(&LoanScenario::default());
        assert_eq!(out.loan_amount, dec!(240_000));
        assert_eq!(out.loan_to_value_ratio, dec!(80));
        // 240k at 5.25% over 30 years
        assert_close(
            out.monthly_principal_and_interest,
            dec!(1325.29),
            dec!(0.01),
            "P&I",
        );
        assert_eq!(out.monthly_property_tax, dec!(250));
        assert_eq!(out.monthly_home_insurance, dec!(100));
        assert_eq!(out.monthly_mortgage_insurance, Decimal::ZERO);
        assert_eq!(out.number_of_payments, 360);
    }

    #[test]
    fn test_ltv_90_conventional_pmi() {
        let input = LoanScenario {
            down_payment: dec!(30_000),
            ..LoanScenario::default()
        };
        let out = run(&input);
        assert_eq!(out.loan_to_value_ratio, dec!(90));
        assert_eq!(out.mortgage_insurance_kind, InsuranceKind::Pmi);
        assert_eq!(out.mortgage_insurance_annual_rate, dec!(0.004));
        assert_eq!(out.monthly_mortgage_insurance, dec!(90));
    }

    #[test]
    fn test_total_is_sum_of_components() {
        let input = LoanScenario {
            down_payment: dec!(15_000),
            monthly_hoa: dec!(125),
            ..LoanScenario::default()
        };
        let out = run(&input);
        let sum = out.monthly_principal_and_interest
            + out.monthly_property_tax
            + out.monthly_home_insurance
            + out.monthly_mortgage_insurance
            + out.monthly_hoa;
        assert_close(out.total_monthly_payment, sum, dec!(0.02), "total");
    }

    #[test]
    fn test_percentages_sum_to_100() {
        let input = LoanScenario {
            loan_type: LoanType::Fha,
            monthly_hoa: dec!(75),
            ..LoanScenario::default()
        };
        let out = run(&input);
        let pct: Decimal = out.payment_breakdown.iter().map(|l| l.percentage).sum();
        assert_close(pct, dec!(100), dec!(0.05), "percentage sum");
        assert_eq!(out.payment_breakdown.len(), 5);
        assert_eq!(out.payment_breakdown[0].label, "Principal & Interest");
        assert_eq!(out.payment_breakdown[3].label, "PMI / MIP");
    }

    #[test]
    fn test_zero_total_gives_zero_percentages() {
        assert_eq!(share_of(dec!(0), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(share_of(dec!(5), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_full_down_payment_leaves_only_escrow() {
        let input = LoanScenario {
            down_payment: dec!(300_000),
            annual_property_tax: Decimal::ZERO,
            annual_home_insurance: Decimal::ZERO,
            ..LoanScenario::default()
        };
        let out = run(&input);
        assert_eq!(out.loan_amount, Decimal::ZERO);
        assert_eq!(out.total_monthly_payment, Decimal::ZERO);
        assert!(out
            .payment_breakdown
            .iter()
            .all(|l| l.percentage == Decimal::ZERO));
    }

    #[test]
    fn test_invalid_input_produces_no_breakdown() {
        let input = LoanScenario {
            down_payment: dec!(400_000),
            ..LoanScenario::default()
        };
        let err = calculate_payment(&input).unwrap_err();
        assert!(matches!(err, MortgageCalcError::InvalidInput { .. }));
    }

    #[test]
    fn test_credit_score_checked_when_pmi_applies() {
        let input = LoanScenario {
            down_payment: dec!(10_000),
            credit_score: 900,
            ..LoanScenario::default()
        };
        assert!(calculate_payment(&input).is_err());

        let va = LoanScenario {
            loan_type: LoanType::Va,
            ..input
        };
        let out = calculate_payment(&va).unwrap();
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_ltv_rounding_to_80_still_charges_pmi() {
        let input = LoanScenario {
            down_payment: dec!(59_990),
            ..LoanScenario::default()
        };
        let out = calculate_payment(&input).unwrap();
        assert_eq!(out.result.loan_to_value_ratio, dec!(80));
        assert_eq!(out.result.mortgage_insurance_kind, InsuranceKind::Pmi);
        assert!(out.result.monthly_mortgage_insurance > Decimal::ZERO);
        assert!(
            out.warnings.iter().any(|w| w.contains("PMI applies")),
            "expected a boundary warning, got {:?}",
            out.warnings
        );
    }

    #[test]
    fn test_deterministic() {
        let input = LoanScenario {
            down_payment: dec!(12_345),
            credit_score: 742,
            ..LoanScenario::default()
        };
        let a = run(&input);
        let b = run(&input);
        assert_eq!(a.total_monthly_payment, b.total_monthly_payment);
        assert_eq!(a.payment_breakdown, b.payment_breakdown);
    }

    #[test]
    fn test_metadata_populated() {
        let out = calculate_payment(&LoanScenario::default()).unwrap();
        assert!(out.methodology.contains("amortisation"));
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
        assert_eq!(out.assumptions["loan_type"], "conventional");
    }
}
