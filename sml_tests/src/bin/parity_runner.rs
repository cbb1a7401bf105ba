//! Lane parity runner.
//!
//! Usage:
//!   cargo run -p sml_tests --bin parity_runner -- [--config parity.json]
//!       [--seed 1234] [--samples 10000] [--magnitude 1000] [--out parity-report.json]
//!
//! Compares the dispatched lane operations against the scalar reference,
//! writes a JSON report and exits non-zero on any mismatch. Flags override
//! values loaded from `--config`.

use std::env;

use anyhow::{bail, Context};
use sml_math::config::ParityConfig;
use sml_math::parity;
use tracing::{error, info};

fn parse_args() -> anyhow::Result<ParityConfig> {
    parse_args_from(env::args().skip(1))
}

fn parse_args_from(args: impl IntoIterator<Item = String>) -> anyhow::Result<ParityConfig> {
    let args: Vec<String> = args.into_iter().collect();

    let mut config_path = None;
    let mut overrides = Vec::new();
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        if !matches!(flag, "--config" | "--seed" | "--samples" | "--magnitude" | "--out") {
            bail!("unknown argument {flag:?}");
        }
        let Some(value) = args.get(i + 1) else {
            bail!("{flag} needs a value");
        };
        if flag == "--config" {
            config_path = Some(value.clone());
        } else {
            overrides.push((flag, value.as_str()));
        }
        i += 2;
    }

    let mut cfg = match config_path {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
            ParityConfig::from_json_str(&text).with_context(|| format!("parse {path}"))?
        }
        None => ParityConfig::default(),
    };

    for (flag, value) in overrides {
        match flag {
            "--seed" => cfg.seed = value.parse().context("--seed")?,
            "--samples" => cfg.samples = value.parse().context("--samples")?,
            "--magnitude" => cfg.magnitude = value.parse().context("--magnitude")?,
            _ => cfg.report_path = value.to_string(),
        }
    }
    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cfg = parse_args()?;
    info!(
        seed = cfg.seed,
        samples = cfg.samples,
        magnitude = cfg.magnitude,
        simd = sml_math::SIMD_ENABLED,
        "Running lane parity"
    );

    let report = parity::run(&cfg).context("run parity checks")?;
    let stats = report.overall_stats();

    let json = report.to_json().context("serialize report")?;
    std::fs::write(&cfg.report_path, json)
        .with_context(|| format!("write {}", cfg.report_path))?;

    info!(
        total = stats.total,
        passed = stats.passed,
        failed = stats.failed,
        elapsed_ms = stats.total_duration.as_millis() as u64,
        report = %cfg.report_path,
        "Parity run finished"
    );

    if !report.all_passed() {
        for case in report.failures() {
            error!(
                op = %case.op,
                element = %case.element,
                mismatches = case.mismatches,
                first = case.first_mismatch.as_deref().unwrap_or(""),
                "Parity failure"
            );
        }
        std::process::exit(1);
    }
    Ok(())
}
