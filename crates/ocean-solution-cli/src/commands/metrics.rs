use std::time::Instant;

use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};

use ocean_solution_core::report::{self, Metric};
use ocean_solution_core::{with_metadata, Year};

use super::{load_context, SourceArgs};

/// Arguments for the full metric summary
#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Purchase year for the single-unit cashflow and payback metrics
    /// (defaults to the start year)
    #[arg(long)]
    pub purchase_year: Option<Year>,
}

/// Arguments for a single metric
#[derive(Args)]
pub struct MetricArgs {
    /// Metric name, e.g. abatement_cost or total_co2_seq
    #[arg(value_parser = parse_metric)]
    pub name: Metric,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Purchase year for the single-unit cashflow and payback metrics
    #[arg(long)]
    pub purchase_year: Option<Year>,

    /// Years before the end year at which change_in_ppm_equiv is read
    #[arg(long, default_value_t = 0)]
    pub delay_period: u32,
}

#[derive(Debug, Serialize)]
struct MetricValue {
    metric: Metric,
    value: Decimal,
}

fn parse_metric(name: &str) -> Result<Metric, String> {
    Metric::ALL
        .iter()
        .copied()
        .find(|metric| metric.name() == name)
        .ok_or_else(|| {
            let known: Vec<&str> = Metric::ALL.iter().map(|m| m.name()).collect();
            format!("unknown metric '{}', expected one of: {}", name, known.join(", "))
        })
}

pub fn run_summary(args: SummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loaded = load_context(&args.source)?;
    let purchase_year = args
        .purchase_year
        .unwrap_or_else(|| loaded.context.start_year());
    let output = report::summarize(&loaded.context, purchase_year, loaded.warnings)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_metric(args: MetricArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let loaded = load_context(&args.source)?;
    let metric_args = report::MetricArgs {
        purchase_year: args
            .purchase_year
            .unwrap_or_else(|| loaded.context.start_year()),
        delay_period: args.delay_period,
    };
    let value = args.name.evaluate(&loaded.context, metric_args)?;

    let output = with_metadata(
        &format!("Single metric: {}", args.name),
        &json!({
            "purchase_year": metric_args.purchase_year,
            "delay_period": metric_args.delay_period,
            "start_year": loaded.context.start_year(),
            "end_year": loaded.context.end_year(),
        }),
        loaded.warnings,
        start.elapsed().as_micros() as u64,
        MetricValue {
            metric: args.name,
            value,
        },
    );
    Ok(serde_json::to_value(output)?)
}
