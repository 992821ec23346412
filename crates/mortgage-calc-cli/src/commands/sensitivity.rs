use clap::{Args, ValueEnum};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use mortgage_calc_core::mortgage::calculator::{self, PaymentBreakdown};
use mortgage_calc_core::mortgage::scenario::LoanScenario;

use crate::input;

/// Arguments for payment sensitivity analysis
#[derive(Args)]
pub struct SensitivityArgs {
    /// First sensitivity variable in format name:min:max:step
    /// (e.g. "annual_interest_rate_percent:4:7:0.5")
    #[arg(long)]
    pub var1: String,

    /// Second sensitivity variable (optional, creates a 2D table)
    #[arg(long)]
    pub var2: Option<String>,

    /// Path to JSON/YAML base scenario (built-in defaults when omitted)
    #[arg(long)]
    pub base_inputs: Option<String>,

    /// Output figure to report for each grid point
    #[arg(long, value_enum, default_value = "total")]
    pub metric: Metric,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Metric {
    Total,
    PrincipalAndInterest,
    MortgageInsurance,
}

impl Metric {
    fn label(self) -> &'static str {
        match self {
            Metric::Total => "total_monthly_payment",
            Metric::PrincipalAndInterest => "monthly_principal_and_interest",
            Metric::MortgageInsurance => "monthly_mortgage_insurance",
        }
    }

    fn pick(self, out: &PaymentBreakdown) -> Decimal {
        match self {
            Metric::Total => out.total_monthly_payment,
            Metric::PrincipalAndInterest => out.monthly_principal_and_interest,
            Metric::MortgageInsurance => out.monthly_mortgage_insurance,
        }
    }
}

#[derive(Debug, Clone)]
struct SensVar {
    name: String,
    min: Decimal,
    max: Decimal,
    step: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
struct SensitivityOutput {
    metric: String,
    var1_name: String,
    var2_name: Option<String>,
    results: Vec<SensitivityRow>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SensitivityRow {
    var1_value: Decimal,
    var2_value: Option<Decimal>,
    output_value: Decimal,
}

/// Scenario fields that can be swept.
const SWEEPABLE: [&str; 8] = [
    "home_price",
    "down_payment",
    "annual_interest_rate_percent",
    "term_years",
    "credit_score",
    "annual_property_tax",
    "annual_home_insurance",
    "monthly_hoa",
];

/// Upper bound on grid points along one axis.
const MAX_POINTS_PER_VAR: u64 = 1_000;

fn parse_sens_var(spec: &str) -> Result<SensVar, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 4 {
        return Err(format!(
            "Sensitivity variable must be name:min:max:step, got '{}'",
            spec
        )
        .into());
    }
    let name = parts[0].to_string();
    if !SWEEPABLE.contains(&name.as_str()) {
        return Err(format!(
            "Cannot vary '{}'. Sweepable fields: {}",
            name,
            SWEEPABLE.join(", ")
        )
        .into());
    }
    let min: Decimal = parts[1].parse()?;
    let max: Decimal = parts[2].parse()?;
    let step: Decimal = parts[3].parse()?;
    if step <= Decimal::ZERO {
        return Err("Sensitivity step must be positive".into());
    }
    if min > max {
        return Err(format!("Sensitivity min {} exceeds max {}", min, max).into());
    }
    let points = (max - min)
        .checked_div(step)
        .and_then(|span| span.floor().to_u64())
        .map(|n| n.saturating_add(1));
    match points {
        Some(n) if n <= MAX_POINTS_PER_VAR => {}
        _ => {
            return Err(format!(
                "Sensitivity range for '{}' yields more than {} points; use a larger step",
                name, MAX_POINTS_PER_VAR
            )
            .into())
        }
    }
    Ok(SensVar { name, min, max, step })
}

fn generate_range(var: &SensVar) -> Vec<Decimal> {
    let mut values = Vec::new();
    let mut v = var.min;
    while v <= var.max {
        values.push(v);
        match v.checked_add(var.step) {
            Some(next) => v = next,
            None => break,
        }
    }
    if values.is_empty() {
        values.push(var.min);
    }
    values
}

/// Integer fields must stay JSON integers; money and rates go in as strings.
fn set_json_field(obj: &mut Value, field: &str, value: Decimal) {
    if let Some(map) = obj.as_object_mut() {
        let encoded = match field {
            "term_years" | "credit_score" => Value::from(value.trunc().to_i64().unwrap_or_default()),
            _ => Value::String(value.to_string()),
        };
        map.insert(field.to_string(), encoded);
    }
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let var1 = parse_sens_var(&args.var1)?;
    let var2 = args.var2.as_ref().map(|s| parse_sens_var(s)).transpose()?;

    let mut base_json = serde_json::to_value(LoanScenario::default())?;
    if let Some(ref path) = args.base_inputs {
        input::overlay(&mut base_json, input::file::read_value(path)?);
    }

    let var1_range = generate_range(&var1);
    let var2_range = var2.as_ref().map(generate_range);

    let run = |v1: Decimal, v2: Option<Decimal>| -> Result<SensitivityRow, Box<dyn std::error::Error>> {
        let mut json = base_json.clone();
        set_json_field(&mut json, &var1.name, v1);
        if let (Some(ref v2_var), Some(v2_val)) = (&var2, v2) {
            set_json_field(&mut json, &v2_var.name, v2_val);
        }
        let scenario: LoanScenario = serde_json::from_value(json)?;
        let result = calculator::calculate_payment(&scenario)?;
        Ok(SensitivityRow {
            var1_value: v1,
            var2_value: v2,
            output_value: args.metric.pick(&result.result),
        })
    };

    let mut results = Vec::new();
    if let Some(ref v2_vals) = var2_range {
        for &v1 in &var1_range {
            for &v2 in v2_vals {
                results.push(run(v1, Some(v2))?);
            }
        }
    } else {
        for &v1 in &var1_range {
            results.push(run(v1, None)?);
        }
    }

    let output = SensitivityOutput {
        metric: args.metric.label().to_string(),
        var1_name: var1.name,
        var2_name: var2.map(|v| v.name),
        results,
    };

    Ok(serde_json::to_value(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_and_range() {
        let var = parse_sens_var("annual_interest_rate_percent:4:5:0.5").unwrap();
        assert_eq!(generate_range(&var), vec![dec!(4), dec!(4.5), dec!(5)]);
    }

    #[test]
    fn test_rejects_unknown_field() {
        assert!(parse_sens_var("loan_type:1:2:1").is_err());
        assert!(parse_sens_var("term_years:30:15:5").is_err());
        assert!(parse_sens_var("term_years:15:30:0").is_err());
    }

    #[test]
    fn test_rejects_oversized_grid() {
        let err = parse_sens_var("annual_interest_rate_percent:4:7:0.0000001").unwrap_err();
        assert!(err.to_string().contains("more than 1000 points"));
        assert!(parse_sens_var("home_price:0:79000000000000000000000000000:0.0000001").is_err());

        let edge = parse_sens_var("monthly_hoa:0:999:1").unwrap();
        assert_eq!(generate_range(&edge).len(), 1_000);
    }

    #[test]
    fn test_integer_fields_stay_integers() {
        let mut json = serde_json::to_value(LoanScenario::default()).unwrap();
        set_json_field(&mut json, "term_years", dec!(15));
        let s: LoanScenario = serde_json::from_value(json).unwrap();
        assert_eq!(s.term_years, 15);
    }

    #[test]
    fn test_rate_sweep_raises_payment() {
        let args = SensitivityArgs {
            var1: "annual_interest_rate_percent:4:6:1".into(),
            var2: None,
            base_inputs: None,
            metric: Metric::Total,
        };
        let out = run_sensitivity(args).unwrap();
        let rows = out["results"].as_array().unwrap();
        assert_eq!(rows.len(), 3);
        let first: Decimal = rows[0]["output_value"].as_str().unwrap().parse().unwrap();
        let last: Decimal = rows[2]["output_value"].as_str().unwrap().parse().unwrap();
        assert!(last > first);
    }
}
