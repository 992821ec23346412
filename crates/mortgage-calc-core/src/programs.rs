//! Catalogue of the loan programs offered alongside the calculator, and a
//! pre-qualification check of a scenario against a program's published
//! minimums.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MortgageCalcError;
use crate::mortgage::scenario::{LoanScenario, LoanType};
use crate::types::Percent;
use crate::MortgageResult;

/// A published loan program. The catalogue is static, so fields borrow
/// `'static` data.
#[derive(Debug, Clone, Serialize)]
pub struct LoanProgram {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    /// Calculator loan type; `None` for products it cannot price (ARM).
    pub loan_type: Option<LoanType>,
    pub rate_min_percent: Percent,
    pub rate_max_percent: Percent,
    /// True when the advertised range is only the initial fixed period.
    pub initial_rate_only: bool,
    pub term_years: &'static [u32],
    pub min_down_payment_percent: Percent,
    pub min_credit_score: u32,
    pub mortgage_insurance: &'static str,
    pub eligibility_notes: &'static str,
    pub featured_benefits: &'static [&'static str],
}

static LOAN_PROGRAMS: [LoanProgram; 6] = [
    LoanProgram {
        id: 1,
        name: "Conventional Fixed-Rate Mortgage",
        description: "Traditional fixed-rate mortgage loans with stable monthly payments.",
        loan_type: Some(LoanType::Conventional),
        rate_min_percent: dec!(5.25),
        rate_max_percent: dec!(6.75),
        initial_rate_only: false,
        term_years: &[15, 20, 30],
        min_down_payment_percent: dec!(3),
        min_credit_score: 620,
        mortgage_insurance: "Required if <20% down",
        eligibility_notes: "Credit score of 620 or higher recommended. PMI required for down payments less than 20%.",
        featured_benefits: &[
            "Predictable payments for the life of the loan",
            "Available for primary residences, second homes, and investment properties",
            "Various term options to fit your financial goals",
        ],
    },
    LoanProgram {
        id: 2,
        name: "FHA Loans",
        description: "Government-backed loans designed for homebuyers with lower credit scores or smaller down payments.",
        loan_type: Some(LoanType::Fha),
        rate_min_percent: dec!(5.00),
        rate_max_percent: dec!(6.50),
        initial_rate_only: false,
        term_years: &[15, 30],
        min_down_payment_percent: dec!(3.5),
        min_credit_score: 580,
        mortgage_insurance: "Required for all loans",
        eligibility_notes: "Credit score of 580 or higher for 3.5% down payment. Mortgage insurance required.",
        featured_benefits: &[
            "Lower down payment requirements",
            "More flexible credit requirements",
            "Lower closing costs",
        ],
    },
    LoanProgram {
        id: 3,
        name: "VA Loans",
        description: "Special loan program for veterans, active-duty service members, and eligible spouses.",
        loan_type: Some(LoanType::Va),
        rate_min_percent: dec!(4.75),
        rate_max_percent: dec!(6.25),
        initial_rate_only: false,
        term_years: &[15, 30],
        min_down_payment_percent: dec!(0),
        min_credit_score: 580,
        mortgage_insurance: "Not required",
        eligibility_notes: "Must have eligible military service. Certificate of Eligibility (COE) required.",
        featured_benefits: &[
            "No down payment required in most cases",
            "No monthly mortgage insurance premiums",
            "Limited closing costs",
        ],
    },
    LoanProgram {
        id: 4,
        name: "Jumbo Loans",
        description: "Loans that exceed the conforming loan limits set by Fannie Mae and Freddie Mac.",
        loan_type: Some(LoanType::Jumbo),
        rate_min_percent: dec!(5.50),
        rate_max_percent: dec!(7.00),
        initial_rate_only: false,
        term_years: &[15, 30],
        min_down_payment_percent: dec!(10),
        min_credit_score: 700,
        mortgage_insurance: "Varies by lender",
        eligibility_notes: "Credit score of 700+ recommended. Higher income and reserves requirements.",
        featured_benefits: &[
            "Finance high-value properties",
            "Competitive rates for well-qualified borrowers",
            "Various term options available",
        ],
    },
    LoanProgram {
        id: 5,
        name: "Adjustable-Rate Mortgage (ARM)",
        description: "Mortgage with an interest rate that adjusts periodically based on market indexes.",
        loan_type: None,
        rate_min_percent: dec!(4.50),
        rate_max_percent: dec!(6.00),
        initial_rate_only: true,
        term_years: &[30],
        min_down_payment_percent: dec!(5),
        min_credit_score: 620,
        mortgage_insurance: "Required if <20% down",
        eligibility_notes: "Credit score of 620 or higher recommended. Initial fixed-rate period followed by adjustable rates.",
        featured_benefits: &[
            "Lower initial interest rates",
            "Good for buyers who plan to move or refinance before the fixed period ends",
            "Rate caps limit how much rates can increase",
        ],
    },
    LoanProgram {
        id: 6,
        name: "USDA Rural Development Loans",
        description: "Government-backed loans for rural and suburban homebuyers with low to moderate incomes.",
        loan_type: Some(LoanType::Usda),
        rate_min_percent: dec!(4.75),
        rate_max_percent: dec!(6.25),
        initial_rate_only: false,
        term_years: &[30],
        min_down_payment_percent: dec!(0),
        min_credit_score: 640,
        mortgage_insurance: "Required for all loans",
        eligibility_notes: "Property must be in an eligible rural area. Income limits apply based on area median income.",
        featured_benefits: &[
            "No down payment required",
            "Lower mortgage insurance rates compared to FHA loans",
            "Competitive interest rates",
        ],
    },
];

/// Every program, in catalogue order.
pub fn loan_programs() -> &'static [LoanProgram] {
    &LOAN_PROGRAMS
}

pub fn find_program(id: u32) -> MortgageResult<&'static LoanProgram> {
    LOAN_PROGRAMS
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| MortgageCalcError::NotFound(format!("loan program {id}")))
}

pub fn programs_for_loan_type(loan_type: LoanType) -> Vec<&'static LoanProgram> {
    LOAN_PROGRAMS
        .iter()
        .filter(|p| p.loan_type == Some(loan_type))
        .collect()
}

// ---------------------------------------------------------------------------
// Eligibility
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub program_id: u32,
    pub program_name: String,
    pub eligible: bool,
    /// Blocking problems.
    pub issues: Vec<String>,
    /// Informational remarks that do not block.
    pub notes: Vec<String>,
}

/// Compare a scenario with a program's published minimums.
pub fn check_eligibility(program: &LoanProgram, scenario: &LoanScenario) -> EligibilityReport {
    let mut issues = Vec::new();
    let mut notes = Vec::new();

    match program.loan_type {
        Some(t) if t != scenario.loan_type => issues.push(format!(
            "Program is priced as {t}, scenario uses {}",
            scenario.loan_type
        )),
        None => notes.push(format!(
            "{} cannot be priced by the fixed-rate calculator",
            program.name
        )),
        _ => {}
    }

    let down_pct = scenario.down_payment_percent();
    if down_pct < program.min_down_payment_percent {
        issues.push(format!(
            "Down payment {}% is below the {}% minimum",
            down_pct.round_dp(2),
            program.min_down_payment_percent
        ));
    }

    if !program.term_years.contains(&scenario.term_years) {
        issues.push(format!(
            "{}-year term not offered (available: {:?})",
            scenario.term_years, program.term_years
        ));
    }

    if scenario.credit_score < program.min_credit_score {
        issues.push(format!(
            "Credit score {} is below the recommended {}",
            scenario.credit_score, program.min_credit_score
        ));
    }

    let rate = scenario.annual_interest_rate_percent;
    if rate < program.rate_min_percent || rate > program.rate_max_percent {
        notes.push(format!(
            "Rate {}% is outside the advertised {}% - {}% range",
            rate, program.rate_min_percent, program.rate_max_percent
        ));
    }
    if program.initial_rate_only {
        notes.push("Advertised rates apply to the initial fixed period only".to_string());
    }
    if program.loan_type == Some(LoanType::Conventional)
        && down_pct < dec!(20)
        && down_pct >= program.min_down_payment_percent
    {
        notes.push("PMI applies until the loan-to-value reaches 80%".to_string());
    }

    EligibilityReport {
        program_id: program.id,
        program_name: program.name.to_string(),
        eligible: issues.is_empty(),
        issues,
        notes,
    }
}

/// Programs whose minimums the scenario meets.
pub fn eligible_programs(scenario: &LoanScenario) -> Vec<EligibilityReport> {
    LOAN_PROGRAMS
        .iter()
        .map(|p| check_eligibility(p, scenario))
        .filter(|r| r.eligible)
        .collect()
}

impl LoanProgram {
    /// Midpoint of the advertised range, a reasonable default rate.
    pub fn typical_rate_percent(&self) -> Percent {
        (self.rate_min_percent + self.rate_max_percent) / dec!(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_catalogue_ids_unique_and_ordered() {
        let ids: Vec<u32> = loan_programs().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_find_program() {
        assert_eq!(find_program(2).unwrap().name, "FHA Loans");
        assert!(matches!(
            find_program(99),
            Err(MortgageCalcError::NotFound(_))
        ));
    }

    #[test]
    fn test_arm_has_no_calculator_type() {
        for t in LoanType::ALL {
            assert!(programs_for_loan_type(t).iter().all(|p| p.id != 5));
        }
        assert_eq!(programs_for_loan_type(LoanType::Usda).len(), 1);
    }

    #[test]
    fn test_default_scenario_eligible_for_conventional() {
        let report = check_eligibility(find_program(1).unwrap(), &LoanScenario::default());
        assert!(report.eligible, "issues: {:?}", report.issues);
        assert!(report.notes.is_empty());
    }

    #[test]
    fn test_jumbo_flags_low_down_payment_and_term() {
        let scenario = LoanScenario {
            loan_type: LoanType::Jumbo,
            down_payment: dec!(15_000),
            term_years: 20,
            ..LoanScenario::default()
        };
        let report = check_eligibility(find_program(4).unwrap(), &scenario);
        assert!(!report.eligible);
        assert_eq!(report.issues.len(), 2);
    }

    #[test]
    fn test_loan_type_mismatch_is_issue() {
        let report = check_eligibility(find_program(3).unwrap(), &LoanScenario::default());
        assert!(!report.eligible);
        assert!(report.issues[0].contains("VA"));
    }

    #[test]
    fn test_rate_outside_range_is_note_only() {
        let scenario = LoanScenario {
            annual_interest_rate_percent: dec!(8),
            ..LoanScenario::default()
        };
        let report = check_eligibility(find_program(1).unwrap(), &scenario);
        assert!(report.eligible);
        assert_eq!(report.notes.len(), 1);
    }

    #[test]
    fn test_eligible_programs_for_default() {
        // ARM is only noted as unpriceable, not excluded
        let ids: Vec<u32> = eligible_programs(&LoanScenario::default())
            .iter()
            .map(|r| r.program_id)
            .collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn test_typical_rate() {
        assert_eq!(find_program(1).unwrap().typical_rate_percent(), dec!(6));
    }
}
