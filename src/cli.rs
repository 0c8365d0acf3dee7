//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::allocation::{decide_allocation, AllocationDecision};
use crate::domain::basket::{describe, Basket};
use crate::domain::config_validation::{
    optional_date, optional_investment, positive_int, ticker_list, validate_config,
};
use crate::domain::error::DualMomentumError;
use crate::domain::indicator::{macd, rsi, IndicatorParams, IndicatorSet};
use crate::domain::returns::{Baseline, Granularity, ReturnSeries};
use crate::domain::snapshot::{Lookbacks, MarketSnapshot};
use crate::domain::universe::{load_basket, load_tickers};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "dualmomentum",
    about = "ETF returns, MACD/RSI indicators and dual-momentum allocation"
)]
pub struct Cli {
    /// Log level used when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decide the allocation for the configured basket
    Decide {
        #[arg(short, long)]
        config: PathBuf,
        /// Amount to invest; overrides [allocation] investment
        #[arg(long)]
        investment: Option<f64>,
        /// Print the decision as JSON
        #[arg(long)]
        json: bool,
    },
    /// Cumulative returns for every basket ticker
    Returns {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long, default_value = "daily")]
        granularity: Granularity,
        /// Use the first of the last N observations as the baseline
        #[arg(long)]
        window: Option<usize>,
        /// Write a wide CSV instead of printing a summary
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// MACD oscillator and RSI for one ticker
    Indicators {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the data range for basket tickers
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
    /// List tickers available in the data directory
    ListTickers {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Everything a run needs, resolved from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub data_dir: PathBuf,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub basket: Basket,
    pub lookbacks: Lookbacks,
    pub indicator_params: IndicatorParams,
    pub investment: Option<f64>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Decide {
            config,
            investment,
            json,
        } => run_decide(&config, investment, json),
        Command::Returns {
            config,
            granularity,
            window,
            output,
        } => run_returns(&config, granularity, window, output.as_ref()),
        Command::Indicators {
            config,
            ticker,
            output,
        } => run_indicators(&config, &ticker, output.as_ref()),
        Command::Info { config, ticker } => run_info(&config, ticker.as_deref()),
        Command::ListTickers { config } => run_list_tickers(&config),
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(err: &DualMomentumError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    tracing::info!(path = %path.display(), "loading config");
    let adapter = FileConfigAdapter::from_file(path).map_err(|e| fail(&e))?;
    validate_config(&adapter).map_err(|e| fail(&e))?;
    Ok(adapter)
}

/// Relative data directories are resolved against the config file's directory.
pub fn resolve_data_dir(config_path: &Path, dir: &str) -> PathBuf {
    let dir = PathBuf::from(dir);
    if dir.is_absolute() {
        return dir;
    }
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(dir),
        _ => dir,
    }
}

pub fn build_basket(config: &dyn ConfigPort) -> Result<Basket, DualMomentumError> {
    let defaults = Basket::default();
    let anchor = config
        .get_non_empty("basket", "anchor")
        .unwrap_or(defaults.anchor);
    let equities = ticker_list(config, "basket", "equities")?.unwrap_or(defaults.equities);
    let bonds = ticker_list(config, "basket", "bonds")?.unwrap_or(defaults.bonds);
    Basket::new(anchor, equities, bonds)
}

pub fn build_lookbacks(config: &dyn ConfigPort) -> Result<Lookbacks, DualMomentumError> {
    let defaults = Lookbacks::default();
    Ok(Lookbacks {
        equity: positive_int(config, "momentum", "equity_lookback", defaults.equity)?,
        bond: positive_int(config, "momentum", "bond_lookback", defaults.bond)?,
    })
}

pub fn build_indicator_params(
    config: &dyn ConfigPort,
) -> Result<IndicatorParams, DualMomentumError> {
    Ok(IndicatorParams {
        macd_fast: positive_int(config, "indicators", "macd_fast", macd::DEFAULT_FAST)?,
        macd_slow: positive_int(config, "indicators", "macd_slow", macd::DEFAULT_SLOW)?,
        macd_signal: positive_int(config, "indicators", "macd_signal", macd::DEFAULT_SIGNAL)?,
        rsi_period: positive_int(config, "indicators", "rsi_period", rsi::DEFAULT_PERIOD)?,
    })
}

pub fn build_settings(
    config_path: &Path,
    config: &dyn ConfigPort,
) -> Result<RunSettings, DualMomentumError> {
    let dir = config
        .get_non_empty("data", "dir")
        .ok_or_else(|| DualMomentumError::ConfigMissing {
            section: "data".into(),
            key: "dir".into(),
        })?;

    Ok(RunSettings {
        data_dir: resolve_data_dir(config_path, &dir),
        start_date: optional_date(config, "data", "start_date")?.unwrap_or(NaiveDate::MIN),
        end_date: optional_date(config, "data", "end_date")?.unwrap_or(NaiveDate::MAX),
        basket: build_basket(config)?,
        lookbacks: build_lookbacks(config)?,
        indicator_params: build_indicator_params(config)?,
        investment: optional_investment(config)?,
    })
}

fn prepare(config_path: &Path) -> Result<(RunSettings, CsvAdapter), ExitCode> {
    let adapter = load_config(config_path)?;
    let settings = build_settings(config_path, &adapter).map_err(|e| fail(&e))?;
    tracing::debug!(dir = %settings.data_dir.display(), "using data directory");
    let data_port = CsvAdapter::new(settings.data_dir.clone());
    Ok((settings, data_port))
}

fn load_snapshot(
    data_port: &dyn DataPort,
    settings: &RunSettings,
) -> Result<MarketSnapshot, DualMomentumError> {
    load_basket(
        data_port,
        &settings.basket,
        &settings.lookbacks,
        settings.start_date,
        settings.end_date,
    )
}

/// Load the basket and decide. `investment` overrides the configured amount.
pub fn decide_pipeline(
    data_port: &dyn DataPort,
    settings: &RunSettings,
    investment: Option<f64>,
) -> Result<AllocationDecision, DualMomentumError> {
    let snapshot = load_snapshot(data_port, settings)?;
    let request = snapshot.allocation_request(
        &settings.basket,
        &settings.lookbacks,
        investment.or(settings.investment),
    )?;
    decide_allocation(&request)
}

pub fn returns_pipeline(
    data_port: &dyn DataPort,
    settings: &RunSettings,
    granularity: Granularity,
    window: Option<usize>,
) -> Result<Vec<ReturnSeries>, DualMomentumError> {
    let snapshot = load_snapshot(data_port, settings)?;
    let baseline = window.map_or(Baseline::First, Baseline::Trailing);
    snapshot.returns(granularity, baseline)
}

/// Indicators for any ticker in the data source, not only basket members.
pub fn indicators_pipeline(
    data_port: &dyn DataPort,
    settings: &RunSettings,
    ticker: &str,
) -> Result<IndicatorSet, DualMomentumError> {
    let ticker = ticker.trim().to_uppercase();
    let series = load_tickers(
        data_port,
        std::slice::from_ref(&ticker),
        settings.start_date,
        settings.end_date,
    )?;
    let snapshot = MarketSnapshot::new(series)?;
    snapshot.indicators(&ticker, &settings.indicator_params)
}

fn pct(value: f64) -> String {
    format!("{:+.2}%", value * 100.0)
}

pub fn format_decision(decision: &AllocationDecision) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Anchor return: {}", pct(decision.anchor_return));
    let _ = writeln!(out, "Mode:          {}", decision.mode);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<8} {:>9} {:>10} {:>12} {:>8} {:>12}",
        "TICKER", "RETURN", "PRICE", "ALLOCATED", "SHARES", "INVESTED"
    );

    for s in &decision.selections {
        let price = s
            .price
            .map(|p| format!("{:.2}", p))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<8} {:>9} {:>10} {:>12.2} {:>8} {:>12.2}",
            s.ticker,
            pct(s.trailing_return),
            price,
            s.allocated,
            s.shares,
            s.invested
        );
        if let Some(text) = describe(&s.ticker) {
            let _ = writeln!(out, "         {}", text);
        }
    }

    if let (Some(investment), Some(cash)) = (decision.investment, decision.cash_remainder) {
        let _ = writeln!(out);
        let _ = writeln!(out, "Investment:    {:.2}", investment);
        let _ = writeln!(out, "Invested:      {:.2}", decision.total_invested());
        let _ = writeln!(out, "Cash:          {:.2}", cash);
    }
    out
}

fn run_decide(config_path: &Path, investment: Option<f64>, json: bool) -> ExitCode {
    let (settings, data_port) = match prepare(config_path) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let decision = match decide_pipeline(&data_port, &settings, investment) {
        Ok(d) => d,
        Err(e) => return fail(&e),
    };

    if json {
        match serde_json::to_string_pretty(&decision) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                return fail(&DualMomentumError::Data {
                    reason: format!("failed to serialize decision: {e}"),
                })
            }
        }
    } else {
        print!("{}", format_decision(&decision));
    }
    ExitCode::SUCCESS
}

fn run_returns(
    config_path: &Path,
    granularity: Granularity,
    window: Option<usize>,
    output: Option<&PathBuf>,
) -> ExitCode {
    let (settings, data_port) = match prepare(config_path) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let series = match returns_pipeline(&data_port, &settings, granularity, window) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    if let Some(path) = output {
        let path = path.to_string_lossy();
        if let Err(e) = CsvReportAdapter::new().write_returns(&series, &path) {
            return fail(&e);
        }
        eprintln!("Returns written to: {}", path);
        return ExitCode::SUCCESS;
    }

    println!("{:<8} {:>12} {:>12} {:>6} {:>10}", "TICKER", "FROM", "TO", "POINTS", "RETURN");
    for rs in &series {
        let (Some(from), Some(to), Some(latest)) = (
            rs.baseline_date(),
            rs.points.last().map(|p| p.date),
            rs.latest(),
        ) else {
            continue;
        };
        let marker = if rs.coverage.is_degraded() { " *" } else { "" };
        println!(
            "{:<8} {:>12} {:>12} {:>6} {:>10}{}",
            rs.ticker,
            from,
            to,
            rs.points.len(),
            pct(latest),
            marker
        );
    }
    if series.iter().any(|rs| rs.coverage.is_degraded()) {
        eprintln!("* history shorter than the requested window; full history used");
    }
    ExitCode::SUCCESS
}

fn run_indicators(config_path: &Path, ticker: &str, output: Option<&PathBuf>) -> ExitCode {
    let (settings, data_port) = match prepare(config_path) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let set = match indicators_pipeline(&data_port, &settings, ticker) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    if let Some(path) = output {
        let path = path.to_string_lossy();
        if let Err(e) = CsvReportAdapter::new().write_indicators(&set, &path) {
            return fail(&e);
        }
        eprintln!("Indicators written to: {}", path);
        return ExitCode::SUCCESS;
    }

    let show = |v: Option<f64>| v.map(|x| format!("{:.4}", x)).unwrap_or_else(|| "-".into());
    println!("{:<12} {:>14} {:>10}", "DATE", "MACD_OSC", "RSI");
    for (date, macd, rsi) in set.rows() {
        println!("{:<12} {:>14} {:>10}", date, show(macd), show(rsi));
    }
    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, ticker: Option<&str>) -> ExitCode {
    let (settings, data_port) = match prepare(config_path) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let tickers = match ticker {
        Some(t) => vec![t.trim().to_uppercase()],
        None => settings.basket.all_tickers(),
    };

    for t in &tickers {
        match data_port.get_data_range(t) {
            Ok(Some((min_date, max_date, count))) => {
                println!("{}: {} points, {} to {}", t, count, min_date, max_date);
            }
            Ok(None) => {
                eprintln!("{}: no data found", t);
            }
            Err(e) => {
                eprintln!("error querying {}: {}", t, e);
            }
        }
    }
    ExitCode::SUCCESS
}

fn run_list_tickers(config_path: &Path) -> ExitCode {
    let (_, data_port) = match prepare(config_path) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let tickers = match data_port.list_tickers() {
        Ok(t) => t,
        Err(e) => return fail(&e),
    };

    if tickers.is_empty() {
        eprintln!("No tickers found in {}", data_port.base_path().display());
    } else {
        for t in &tickers {
            match describe(t) {
                Some(text) => println!("{:<8} {}", t, text),
                None => println!("{}", t),
            }
        }
        eprintln!("{} tickers found", tickers.len());
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let (settings, _) = match prepare(config_path) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let basket = &settings.basket;
    eprintln!("\nData:");
    eprintln!("  dir:       {}", settings.data_dir.display());
    eprintln!("\nBasket:");
    eprintln!("  anchor:    {}", basket.anchor);
    eprintln!("  equities:  {}", basket.equities.join(", "));
    eprintln!("  bonds:     {}", basket.bonds.join(", "));
    eprintln!("\nMomentum:");
    eprintln!(
        "  lookbacks: equity {} / bond {} observations",
        settings.lookbacks.equity, settings.lookbacks.bond
    );
    let p = &settings.indicator_params;
    eprintln!("\nIndicators:");
    eprintln!(
        "  MACD({}, {}, {}), RSI({})",
        p.macd_fast, p.macd_slow, p.macd_signal, p.rsi_period
    );
    if let Some(amount) = settings.investment {
        eprintln!("\nInvestment:  {:.2}", amount);
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
