use napi::Result as NapiResult;
use napi_derive::napi;

use mortgage_calc_core::mortgage::{calculator, scenario::LoanScenario, schedule};
use mortgage_calc_core::programs;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Payment calculator
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_payment(input_json: String) -> NapiResult<String> {
    let input: LoanScenario = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = calculator::calculate_payment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn default_scenario() -> NapiResult<String> {
    serde_json::to_string(&LoanScenario::default()).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: schedule::ScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = schedule::amortization_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Loan programs
// ---------------------------------------------------------------------------

#[napi]
pub fn loan_programs() -> NapiResult<String> {
    serde_json::to_string(programs::loan_programs()).map_err(to_napi_error)
}

#[napi]
pub fn check_eligibility(program_id: u32, scenario_json: String) -> NapiResult<String> {
    let scenario: LoanScenario = serde_json::from_str(&scenario_json).map_err(to_napi_error)?;
    let program = programs::find_program(program_id).map_err(to_napi_error)?;
    let report = programs::check_eligibility(program, &scenario);
    serde_json::to_string(&report).map_err(to_napi_error)
}

#[napi]
pub fn eligible_programs(scenario_json: String) -> NapiResult<String> {
    let scenario: LoanScenario = serde_json::from_str(&scenario_json).map_err(to_napi_error)?;
    serde_json::to_string(&programs::eligible_programs(&scenario)).map_err(to_napi_error)
}
