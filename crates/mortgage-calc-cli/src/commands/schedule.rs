use clap::Args;
use serde_json::Value;

use mortgage_calc_core::mortgage::schedule;

use super::payment::ScenarioArgs;

/// Arguments for the amortisation schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Only report yearly totals, omitting the monthly rows
    #[arg(long)]
    pub yearly: bool,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario = args.scenario.resolve()?;
    let mut result = schedule::amortization_schedule(&scenario.schedule_input())?;
    if args.yearly {
        result.result.rows.clear();
    }
    Ok(serde_json::to_value(result)?)
}
