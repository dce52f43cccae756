//! sigfuse CLI
//!
//! Evaluates one candle file (JSON array of candles) with an optional
//! advisory file and prints the resulting signal as JSON.
//!
//! Usage: `sigfuse <candles.json> [advisory.json]`, or set `CANDLES_PATH`
//! and `ADVISORY_PATH`. `CONFIG_PATH` points at an engine config document.

use dotenvy::dotenv;
use sigfuse::config::{get_environment, EngineConfig};
use sigfuse::logging;
use sigfuse::models::{AdvisoryInput, Candle, CandleSeries};
use sigfuse::SignalEngine;
use std::env;
use std::fs;
use tracing::info;

fn read_json<T: serde::de::DeserializeOwned>(
    path: &str,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    let raw = fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path, e))?;
    let value = serde_json::from_str(&raw).map_err(|e| format!("failed to parse {}: {}", path, e))?;
    Ok(value)
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    logging::init_logging();

    let mut args = env::args().skip(1);
    let candles_path = args
        .next()
        .or_else(|| env::var("CANDLES_PATH").ok())
        .ok_or("usage: sigfuse <candles.json> [advisory.json]")?;
    let advisory_path = args.next().or_else(|| env::var("ADVISORY_PATH").ok());

    info!(environment = %get_environment(), candles = %candles_path, "starting evaluation");

    let config = EngineConfig::from_env()?;
    let engine = SignalEngine::new(config)?;

    let candles: Vec<Candle> = read_json(&candles_path)?;
    let series = CandleSeries::new(candles)?;
    let advisory: Option<AdvisoryInput> = match advisory_path {
        Some(path) => Some(read_json(&path)?),
        None => None,
    };

    let signal = engine.evaluate(&series, advisory.as_ref())?;
    println!("{}", serde_json::to_string_pretty(&signal)?);
    Ok(())
}
