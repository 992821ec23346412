use clap::Args;
use serde_json::Value;

use mortgage_calc_core::mortgage::scenario::LoanType;
use mortgage_calc_core::programs;

/// Arguments for browsing the loan program catalogue
#[derive(Args)]
pub struct ProgramsArgs {
    /// Show a single program by id
    #[arg(long)]
    pub id: Option<u32>,

    /// Only programs priced as this loan type
    #[arg(long)]
    pub loan_type: Option<LoanType>,
}

pub fn run_programs(args: ProgramsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(id) = args.id {
        let program = programs::find_program(id)?;
        return Ok(serde_json::to_value(program)?);
    }
    let listed = match args.loan_type {
        Some(t) => programs::programs_for_loan_type(t),
        None => programs::loan_programs().iter().collect(),
    };
    Ok(serde_json::to_value(listed)?)
}
