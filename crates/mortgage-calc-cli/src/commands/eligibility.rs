use clap::Args;
use serde_json::Value;

use mortgage_calc_core::mortgage::scenario::LoanScenario;
use mortgage_calc_core::programs::{self, LoanProgram};

use super::payment::ScenarioArgs;

/// Arguments for checking a scenario against loan programs
#[derive(Args)]
pub struct EligibilityArgs {
    /// Program id to check (all programs when omitted)
    #[arg(long)]
    pub program: Option<u32>,

    /// When checking all programs, list only those the scenario qualifies for
    #[arg(long)]
    pub eligible_only: bool,

    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

/// Default scenario priced the way the program advertises: its loan type and
/// the middle of its rate range. Flags and `--defaults` still win.
fn program_base(program: &LoanProgram) -> LoanScenario {
    let defaults = LoanScenario::default();
    LoanScenario {
        annual_interest_rate_percent: program.typical_rate_percent(),
        loan_type: program.loan_type.unwrap_or(defaults.loan_type),
        ..defaults
    }
}

pub fn run_eligibility(args: EligibilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(id) = args.program {
        let program = programs::find_program(id)?;
        let scenario = args.scenario.resolve_from(program_base(program))?;
        let report = programs::check_eligibility(program, &scenario);
        return Ok(serde_json::to_value(report)?);
    }

    let scenario = args.scenario.resolve()?;
    if args.eligible_only {
        return Ok(serde_json::to_value(programs::eligible_programs(&scenario))?);
    }
    let reports: Vec<_> = programs::loan_programs()
        .iter()
        .map(|p| programs::check_eligibility(p, &scenario))
        .collect();
    Ok(serde_json::to_value(reports)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mortgage_calc_core::mortgage::scenario::LoanType;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_program_base_uses_typical_rate_and_loan_type() {
        let va = programs::find_program(3).unwrap();
        let base = program_base(va);
        assert_eq!(base.annual_interest_rate_percent, dec!(5.5));
        assert_eq!(base.loan_type, LoanType::Va);
        assert_eq!(base.home_price, LoanScenario::default().home_price);

        // ARM has no fixed loan type, so the default one is kept.
        let arm = programs::find_program(5).unwrap();
        assert_eq!(program_base(arm).loan_type, LoanType::Conventional);
    }

    #[test]
    fn test_rate_flag_overrides_program_rate() {
        let args = ScenarioArgs {
            rate: Some(dec!(7.25)),
            ..ScenarioArgs::default()
        };
        let va = programs::find_program(3).unwrap();
        let scenario = args.apply_flags(program_base(va));
        assert_eq!(scenario.annual_interest_rate_percent, dec!(7.25));
        assert_eq!(scenario.loan_type, LoanType::Va);
    }
}
