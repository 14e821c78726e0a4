//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::compare::{Comparison, compare_series};
use crate::domain::config_validation::{
    compare_window, date_range, fundamentals_dir, price_dir, universe_codes, validate_config,
};
use crate::domain::error::ScoreError;
use crate::domain::fundamentals::{FundamentalField, FundamentalSnapshot};
use crate::domain::report::{TickerReport, build_report};
use crate::domain::universe::{ScanResult, SkipReason, parse_codes, scan_universe};
use crate::logging::dispatch_from_config;
use crate::ports::config_port::ConfigPort;
use crate::ports::fundamentals_port::FundamentalsPort;
use crate::ports::price_port::PricePort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "buyscore", about = "Technical and fundamental buy score for stocks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Indicator table, fundamentals and buy score for one ticker
    Report {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        ticker: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Score a universe of tickers and show the best pick
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        codes: Option<String>,
    },
    /// Rolling correlation and cumulative returns for two tickers
    Compare {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long, num_args = 2, value_names = ["LEFT", "RIGHT"])]
        tickers: Vec<String>,
        #[arg(short, long)]
        window: Option<usize>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List tickers available in the price directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

impl Command {
    fn config_path(&self) -> &Path {
        match self {
            Command::Report { config, .. }
            | Command::Scan { config, .. }
            | Command::Compare { config, .. }
            | Command::Validate { config }
            | Command::ListSymbols { config } => config,
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let config = match load_config(cli.command.config_path()) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let dispatch = match dispatch_from_config(&config) {
        Ok(d) => d,
        Err(e) => return fail(&e),
    };

    let result = tracing::dispatcher::with_default(&dispatch, || execute(&cli.command, &config));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn fail(err: &ScoreError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(err)
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

fn execute(command: &Command, config: &FileConfigAdapter) -> Result<(), ScoreError> {
    validate_config(config)?;
    match command {
        Command::Report { ticker, output, .. } => {
            run_report(config, &ticker.to_uppercase(), output.as_deref())
        }
        Command::Scan { codes, .. } => run_scan(config, codes.as_deref()),
        Command::Compare {
            tickers,
            window,
            output,
            ..
        } => run_compare(config, tickers, *window, output.as_deref()),
        Command::Validate { config: path } => {
            eprintln!("Configuration {} is valid.", path.display());
            Ok(())
        }
        Command::ListSymbols { .. } => run_list_symbols(config),
    }
}

pub fn build_data_adapter(config: &dyn ConfigPort) -> Result<CsvAdapter, ScoreError> {
    Ok(CsvAdapter::new(
        PathBuf::from(price_dir(config)?),
        PathBuf::from(fundamentals_dir(config)?),
    ))
}

/// `--codes` wins over `[universe] codes`, which wins over every listed symbol.
pub fn resolve_codes(
    codes_override: Option<&str>,
    config: &dyn ConfigPort,
    prices: &dyn PricePort,
) -> Result<Vec<String>, ScoreError> {
    if let Some(raw) = codes_override {
        return Ok(parse_codes(raw)?);
    }
    match universe_codes(config)? {
        Some(codes) => Ok(codes),
        None => prices.list_symbols(),
    }
}

pub fn resolve_window(
    window_override: Option<usize>,
    config: &dyn ConfigPort,
) -> Result<usize, ScoreError> {
    match window_override {
        Some(w) => Ok(w),
        None => compare_window(config),
    }
}

fn fetch_snapshot(fundamentals: &dyn FundamentalsPort, ticker: &str) -> FundamentalSnapshot {
    fundamentals.fetch_fundamentals(ticker).unwrap_or_else(|e| {
        tracing::warn!(ticker, error = %e, "fundamentals unavailable, scoring technicals only");
        FundamentalSnapshot::new()
    })
}

fn run_report(
    config: &dyn ConfigPort,
    ticker: &str,
    output: Option<&Path>,
) -> Result<(), ScoreError> {
    let adapter = build_data_adapter(config)?;
    let series = adapter.fetch_prices(ticker, date_range(config)?)?;
    let snapshot = fetch_snapshot(&adapter, ticker);
    let report = build_report(&series, snapshot)?;

    print_report(&report);

    if let Some(path) = output {
        CsvReportAdapter::new().write_report(&report, &path.to_string_lossy())?;
        eprintln!("\nIndicator table written to: {}", path.display());
    }
    Ok(())
}

fn print_report(report: &TickerReport) {
    println!("=== {} ===", report.ticker);

    if let Some(row) = report.latest() {
        let show = |v: Option<f64>| v.map(|x| format!("{:.2}", x)).unwrap_or("N/A".into());
        println!("\nLatest indicators ({}):", row.timestamp.date());
        println!("  Close:            {:.2}", row.close);
        println!("  SMA 20:           {}", show(row.sma_20));
        println!("  EMA 20:           {}", show(row.ema_20));
        println!("  RSI 14:           {}", show(row.rsi_14));
        println!("  MACD:             {}", show(row.macd));
        println!("  MACD Signal:      {}", show(row.macd_signal));
        println!("  MACD Diff:        {}", show(row.macd_diff));
        println!("  Bollinger High:   {}", show(row.bollinger_high_20));
        println!("  Bollinger Low:    {}", show(row.bollinger_low_20));
    }

    println!("\nFundamentals:");
    for field in FundamentalField::ALL {
        println!("  {:<26}{}", field.label(), report.snapshot.display(field));
    }

    println!("\nSignals:");
    for rule in &report.breakdown.fired {
        println!("  {:<26}{:+}", rule.signal.label(), rule.delta);
    }
    for signal in &report.breakdown.skipped {
        println!("  {:<26}skipped (not available)", signal.label());
    }

    println!("\nBuy score: {} / 100", report.breakdown.score);
}

fn run_scan(config: &dyn ConfigPort, codes_override: Option<&str>) -> Result<(), ScoreError> {
    let adapter = build_data_adapter(config)?;
    let codes = resolve_codes(codes_override, config, &adapter)?;
    eprintln!("Scanning {} tickers...", codes.len());

    let result = scan_universe(&adapter, &adapter, &codes, date_range(config)?)?;
    print_scan(&result);
    Ok(())
}

fn print_scan(result: &ScanResult) {
    println!("{:<10}{:>6}{:>8}", "Ticker", "Score", "Points");
    for scored in &result.scored {
        println!(
            "{:<10}{:>6}{:>8}",
            scored.ticker,
            scored.score(),
            scored.points
        );
    }

    for skipped in &result.skipped {
        match skipped.reason {
            SkipReason::NoData => eprintln!("skipped {}: no data", skipped.ticker),
            SkipReason::InsufficientData { points } => {
                eprintln!("skipped {}: insufficient data ({} points)", skipped.ticker, points)
            }
        }
    }

    match result.best() {
        Some(best) => println!("\nBest pick: {} (score {})", best.ticker, best.score()),
        None => println!("\nBest pick: none (no ticker scored above 0)"),
    }
}

fn run_compare(
    config: &dyn ConfigPort,
    tickers: &[String],
    window_override: Option<usize>,
    output: Option<&Path>,
) -> Result<(), ScoreError> {
    let (left, right) = match tickers {
        [l, r] => (l.to_uppercase(), r.to_uppercase()),
        _ => {
            return Err(ScoreError::Data {
                reason: "compare needs exactly two tickers".to_string(),
            });
        }
    };
    let window = resolve_window(window_override, config)?;
    let adapter = build_data_adapter(config)?;
    let range = date_range(config)?;

    let a = adapter.fetch_prices(&left, range)?;
    let b = adapter.fetch_prices(&right, range)?;
    let comparison = compare_series(&a, &b, window)?;

    print_comparison(&comparison);

    if let Some(path) = output {
        CsvReportAdapter::new().write_comparison(&comparison, &path.to_string_lossy())?;
        eprintln!("\nComparison written to: {}", path.display());
    }
    Ok(())
}

fn print_comparison(c: &Comparison) {
    println!("=== {} vs {} ===", c.left, c.right);
    println!("Aligned points:      {}", c.aligned.len());
    println!("Paired changes:      {}", c.pct_change.len());
    match c.latest_correlation() {
        Some(corr) => println!("Correlation ({}):     {:.3}", c.window, corr),
        None => println!("Correlation ({}):     N/A (window not filled)", c.window),
    }
    if let Some(last) = c.cumulative_return.last() {
        println!("Cumulative {:<9}{:+.2}%", format!("{}:", c.left), last.left * 100.0);
        println!("Cumulative {:<9}{:+.2}%", format!("{}:", c.right), last.right * 100.0);
    }
}

fn run_list_symbols(config: &dyn ConfigPort) -> Result<(), ScoreError> {
    let symbols = build_data_adapter(config)?.list_symbols()?;
    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    Ok(())
}
