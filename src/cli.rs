use std::net::IpAddr;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use thiserror::Error;

use crate::config::{DEFAULT_PORT, ServerConfig, projection_config};
use crate::core::{RawRoiInput, calculate_with};
use crate::error::{ConfigError, StrictInputError, require_strict};
use crate::report::render_summary;
use crate::store::DEFAULT_HISTORY_CAPACITY;

#[derive(Parser, Debug)]
#[command(
    name = "roi",
    about = "Estimate the return of automating per-invoice manual work"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one calculation and print the result
    Calc(CalcArgs),
    /// Serve the web calculator and JSON API
    Serve(ServeArgs),
}

// Field values stay as text so they go through the same coercion as form and
// JSON input: `--hourly-wage abc` counts as 0 unless --strict is set.
#[derive(Args, Debug, Clone)]
pub struct CalcArgs {
    #[arg(long, default_value = "500", allow_hyphen_values = true)]
    pub invoices_per_month: String,
    #[arg(long, default_value = "12", allow_hyphen_values = true)]
    pub manual_mins_per_invoice: String,
    #[arg(long, default_value = "3", allow_hyphen_values = true)]
    pub automation_mins_per_invoice: String,
    #[arg(long, default_value = "35", allow_hyphen_values = true)]
    pub hourly_wage: String,
    #[arg(long, default_value = "250", allow_hyphen_values = true)]
    pub software_cost_per_month: String,
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub implementation_cost_one_time: String,
    #[arg(long, help = "Projection length in months (1-120), default 12")]
    pub horizon_months: Option<u32>,
    #[arg(
        long,
        allow_hyphen_values = true,
        help = "Monthly invoice volume growth in percent, applied to the projection only"
    )]
    pub volume_growth: Option<f64>,
    #[arg(long, help = "Reject values that are not numbers instead of using 0")]
    pub strict: bool,
    #[arg(long, help = "Print the result as JSON")]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, env = "ROI_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,
    #[arg(long, env = "ROI_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    #[arg(
        long,
        env = "ROI_HISTORY_CAPACITY",
        default_value_t = DEFAULT_HISTORY_CAPACITY,
        help = "Number of scenarios kept in the in-memory history"
    )]
    pub history_capacity: usize,
}

impl ServeArgs {
    pub fn into_config(self) -> Result<ServerConfig, ConfigError> {
        ServerConfig::new(self.host, self.port, self.history_capacity)
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Strict(#[from] StrictInputError),
    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

impl CalcArgs {
    fn raw_input(&self) -> RawRoiInput {
        RawRoiInput {
            invoices_per_month: Value::String(self.invoices_per_month.clone()),
            manual_mins_per_invoice: Value::String(self.manual_mins_per_invoice.clone()),
            automation_mins_per_invoice: Value::String(self.automation_mins_per_invoice.clone()),
            hourly_wage: Value::String(self.hourly_wage.clone()),
            software_cost_per_month: Value::String(self.software_cost_per_month.clone()),
            implementation_cost_one_time: Value::String(
                self.implementation_cost_one_time.clone(),
            ),
        }
    }
}

pub fn run_calc(args: &CalcArgs) -> Result<String, CliError> {
    let projection = projection_config(args.horizon_months, args.volume_growth)?;
    let coerced = args.raw_input().coerce();

    let input = if args.strict {
        require_strict(coerced)?
    } else {
        for diagnostic in coerced.diagnostics.iter().filter(|d| d.coerced.used_fallback()) {
            tracing::warn!(field = diagnostic.field, "value is not a number; using 0");
        }
        coerced.input
    };

    let result = calculate_with(&input, &projection);
    tracing::debug!(
        monthly_savings = result.monthly_savings,
        roi_percent = result.roi_percent,
        "calculated"
    );

    if args.json {
        let mut out = serde_json::to_string_pretty(&result)?;
        out.push('\n');
        Ok(out)
    } else {
        Ok(render_summary(&result))
    }
}
