use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_calc_core::mortgage::calculator;
use mortgage_calc_core::mortgage::scenario::{LoanScenario, LoanType};

use crate::input;

/// Loan scenario flags shared by every command that prices a loan
#[derive(Args, Debug, Default)]
pub struct ScenarioArgs {
    /// Path to a JSON/YAML scenario (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Partial JSON/YAML scenario applied over the built-in defaults
    #[arg(long)]
    pub defaults: Option<String>,

    /// Home purchase price
    #[arg(long)]
    pub home_price: Option<Decimal>,

    /// Down payment (defaults to 20% of a given --home-price)
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 5.25)
    #[arg(long, alias = "interest-rate")]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, alias = "loan-term")]
    pub term: Option<u32>,

    /// conventional, fha, va, jumbo or usda
    #[arg(long)]
    pub loan_type: Option<LoanType>,

    /// Credit score (300-850)
    #[arg(long)]
    pub credit_score: Option<u32>,

    /// Annual property tax
    #[arg(long)]
    pub property_tax: Option<Decimal>,

    /// Annual homeowner's insurance
    #[arg(long)]
    pub home_insurance: Option<Decimal>,

    /// Monthly HOA dues
    #[arg(long)]
    pub hoa: Option<Decimal>,
}

impl ScenarioArgs {
    /// Build the scenario from `--input`, piped stdin, or defaults plus flags.
    pub fn resolve(&self) -> Result<LoanScenario, Box<dyn std::error::Error>> {
        self.resolve_from(LoanScenario::default())
    }

    /// Like [`resolve`](Self::resolve), with `fallback` standing in for the
    /// built-in defaults under `--defaults` and the flags.
    pub fn resolve_from(
        &self,
        fallback: LoanScenario,
    ) -> Result<LoanScenario, Box<dyn std::error::Error>> {
        if let Some(scenario) = input::load::<LoanScenario>(self.input.as_deref())? {
            return Ok(scenario);
        }

        let base = match self.defaults {
            Some(ref path) => {
                let mut base = serde_json::to_value(fallback)?;
                input::overlay(&mut base, input::file::read_value(path)?);
                serde_json::from_value(base)?
            }
            None => fallback,
        };
        Ok(self.apply_flags(base))
    }

    /// Layer the individual flags over a base scenario.
    pub fn apply_flags(&self, mut scenario: LoanScenario) -> LoanScenario {
        if let Some(price) = self.home_price {
            scenario = scenario.with_home_price(price);
        }
        if let Some(v) = self.down_payment {
            scenario.down_payment = v;
        }
        if let Some(v) = self.rate {
            scenario.annual_interest_rate_percent = v;
        }
        if let Some(v) = self.term {
            scenario.term_years = v;
        }
        if let Some(v) = self.loan_type {
            scenario.loan_type = v;
        }
        if let Some(v) = self.credit_score {
            scenario.credit_score = v;
        }
        if let Some(v) = self.property_tax {
            scenario.annual_property_tax = v;
        }
        if let Some(v) = self.home_insurance {
            scenario.annual_home_insurance = v;
        }
        if let Some(v) = self.hoa {
            scenario.monthly_hoa = v;
        }
        scenario
    }
}

/// Arguments for the monthly payment calculator
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PaymentArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario = args.scenario.resolve()?;
    tracing::debug!(?scenario, "resolved payment scenario");
    let result = calculator::calculate_payment(&scenario)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_home_price_flag_rederives_down_payment() {
        let args = ScenarioArgs {
            home_price: Some(dec!(500_000)),
            ..ScenarioArgs::default()
        };
        let s = args.apply_flags(LoanScenario::default());
        assert_eq!(s.down_payment, dec!(100_000));
    }

    #[test]
    fn test_explicit_down_payment_wins() {
        let args = ScenarioArgs {
            home_price: Some(dec!(500_000)),
            down_payment: Some(dec!(25_000)),
            loan_type: Some(LoanType::Fha),
            ..ScenarioArgs::default()
        };
        let s = args.apply_flags(LoanScenario::default());
        assert_eq!(s.down_payment, dec!(25_000));
        assert_eq!(s.loan_type, LoanType::Fha);
    }

    #[test]
    fn test_no_flags_keeps_base() {
        let s = ScenarioArgs::default().apply_flags(LoanScenario::default());
        assert_eq!(s, LoanScenario::default());
    }
}
