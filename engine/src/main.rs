// Local harness: analyze a price history CSV and print the report as JSON.
use analytics_engine::config::AnalyticsSettings;
use analytics_engine::data::PriceCsvParser;
use analytics_engine::services::{AnalysisRequest, AnalyticsFacade};
use anyhow::{bail, Context, Result};
use tracing::info;

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the report.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let mut args = std::env::args().skip(1);
    let Some(csv_path) = args.next() else {
        bail!("usage: analytics-engine <prices.csv> [request.json]");
    };
    let request_path = args.next();

    let settings = match std::env::var("ANALYTICS_SETTINGS") {
        Ok(path) => AnalyticsSettings::load_from_file(&path).with_context(|| format!("loading settings from {}", path))?,
        Err(_) => AnalyticsSettings::load_default().context("loading embedded default settings")?,
    };

    let series = PriceCsvParser::load_series(&csv_path).with_context(|| format!("loading prices from {}", csv_path))?;
    info!(path = %csv_path, observations = series.len(), "Loaded price history");

    let request = match request_path {
        Some(path) => {
            let raw = std::fs::read_to_string(&path).with_context(|| format!("reading request {}", path))?;
            AnalysisRequest::from_json(&raw).with_context(|| format!("parsing request {}", path))?
        }
        None => AnalysisRequest::select_all(&settings),
    };

    let report = AnalyticsFacade::new().analyze(&series, &request)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
