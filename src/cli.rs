//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::BacktestConfig;
use crate::domain::config_validation::{
    parse_date, parse_strategy, parse_warmup, read_trading_days, validate_backtest_config,
    validate_strategy_config,
};
use crate::domain::error::StratlabError;
use crate::domain::pipeline::{self, BacktestReport};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceDataPort;
use crate::ports::report_port::ReportPort;

const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser, Debug)]
#[command(name = "stratlab", about = "Single-asset strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        /// momentum or mean_reversion
        #[arg(short, long)]
        strategy: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Write the aligned series to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List tickers available in the data directory
    ListTickers {
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Values given on the command line; each one takes precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub ticker: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub strategy: Option<String>,
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stratlab=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            ticker,
            start,
            end,
            strategy,
            data_dir,
            output,
        } => {
            let overrides = RunOverrides {
                ticker,
                start,
                end,
                strategy,
            };
            run_backtest(
                config.as_deref(),
                &overrides,
                data_dir.as_deref(),
                output.as_deref(),
            )
        }
        Command::Validate { config } => run_validate(&config),
        Command::ListTickers { data_dir, config } => {
            run_list_tickers(data_dir.as_deref(), config.as_deref())
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, ExitCode> {
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            FileConfigAdapter::from_file(path).map_err(|err| {
                eprintln!("error: {err}");
                ExitCode::from(&err)
            })
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

fn run_backtest(
    config_path: Option<&Path>,
    overrides: &RunOverrides,
    data_dir: Option<&Path>,
    output_path: Option<&Path>,
) -> ExitCode {
    // Stage 1: Load config
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Build and validate BacktestConfig, overrides applied
    let bt_config = match build_backtest_config(&adapter, overrides) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: Data port
    let data_dir = resolve_data_dir(data_dir, &adapter);
    let data_port = CsvPriceAdapter::new(data_dir);

    run_backtest_pipeline(&data_port, &CsvReportAdapter, &bt_config, output_path)
}

pub fn resolve_data_dir(data_dir: Option<&Path>, config: &dyn ConfigPort) -> PathBuf {
    data_dir
        .map(Path::to_path_buf)
        .or_else(|| config.get_string("backtest", "data_dir").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
    overrides: &RunOverrides,
) -> Result<BacktestConfig, StratlabError> {
    let ticker = overrides
        .ticker
        .clone()
        .or_else(|| adapter.get_string("backtest", "ticker"))
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| StratlabError::ConfigMissing {
            section: "backtest".into(),
            key: "ticker".into(),
        })?;

    let start_date = required_date(adapter, overrides.start.as_deref(), "start_date")?;
    let end_date = required_date(adapter, overrides.end.as_deref(), "end_date")?;

    let kind = overrides
        .strategy
        .clone()
        .or_else(|| adapter.get_string("strategy", "kind"))
        .unwrap_or_else(|| "momentum".to_string());

    let config = BacktestConfig {
        ticker,
        start_date,
        end_date,
        strategy: parse_strategy(adapter, &kind)?,
        warmup: parse_warmup(adapter)?,
        trading_days_per_year: read_trading_days(adapter)?,
    };
    config.validate()?;
    Ok(config)
}

fn required_date(
    adapter: &dyn ConfigPort,
    cli_value: Option<&str>,
    key: &str,
) -> Result<chrono::NaiveDate, StratlabError> {
    let value = cli_value
        .map(str::to_string)
        .or_else(|| adapter.get_string("backtest", key))
        .ok_or_else(|| StratlabError::ConfigMissing {
            section: "backtest".into(),
            key: key.into(),
        })?;
    parse_date(&value, "backtest", key)
}

pub fn run_backtest_pipeline(
    data_port: &dyn PriceDataPort,
    report_port: &dyn ReportPort,
    bt_config: &BacktestConfig,
    output_path: Option<&Path>,
) -> ExitCode {
    // Stage 4: Fetch prices
    tracing::info!(
        ticker = %bt_config.ticker,
        start = %bt_config.start_date,
        end = %bt_config.end_date,
        "fetching prices"
    );
    let prices = match data_port.fetch_prices(
        &bt_config.ticker,
        bt_config.start_date,
        bt_config.end_date,
    ) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if prices.is_empty() {
        let err = StratlabError::NoData {
            ticker: bt_config.ticker.clone(),
        };
        eprintln!("error: {err}");
        return (&err).into();
    }

    // Stage 5: Run the pipeline
    let report = match pipeline::run(prices, bt_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 6: Console summary
    eprintln!();
    for line in summary_lines(&bt_config.ticker, &report) {
        eprintln!("{line}");
    }

    // Stage 7: Optional CSV output
    if let Some(path) = output_path {
        if let Err(e) = report_port.write(&report, path) {
            eprintln!("error: failed to write report: {e}");
            return (&e).into();
        }
        eprintln!("\nReport written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

pub fn summary_lines(ticker: &str, report: &BacktestReport) -> Vec<String> {
    let mut lines = vec![
        format!("=== {} {} ===", ticker, report.strategy),
        format!("Bars:                  {}", report.prices.len()),
    ];

    if let Some(market) = report.evaluation.market_cumulative.last_defined() {
        lines.push(format!("Market Return:         {:.2}%", (market - 1.0) * 100.0));
    }

    match &report.metrics {
        Ok(m) => {
            lines.push(format!("Total Return:          {:.2}%", m.total_return * 100.0));
            lines.push(format!(
                "Annualized Volatility: {:.2}%",
                m.annualized_volatility * 100.0
            ));
            lines.push(format!("Sharpe Ratio:          {:.2}", m.sharpe_ratio));
            lines.push(format!("Max Drawdown:          -{:.1}%", m.max_drawdown * 100.0));
        }
        Err(e) => {
            if let Some(strategy) = report.evaluation.strategy_cumulative.last_defined() {
                lines.push(format!(
                    "Total Return:          {:.2}%",
                    (strategy - 1.0) * 100.0
                ));
            }
            lines.push(format!("Metrics unavailable:   {e}"));
        }
    }

    lines
}

fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_config(Some(config_path)) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let result = validate_backtest_config(&adapter)
        .and_then(|()| validate_strategy_config(&adapter))
        .and_then(|()| build_backtest_config(&adapter, &RunOverrides::default()));

    match result {
        Ok(config) => {
            eprintln!("Ticker:     {}", config.ticker);
            eprintln!("Range:      {} to {}", config.start_date, config.end_date);
            eprintln!("Strategy:   {}", config.strategy);
            eprintln!("Warmup:     {:?}", config.warmup);
            eprintln!("Annualize:  {} periods/year", config.trading_days_per_year);
            eprintln!("\nConfiguration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_list_tickers(data_dir: Option<&Path>, config_path: Option<&Path>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let adapter = CsvPriceAdapter::new(resolve_data_dir(data_dir, &config));
    let tickers = match adapter.list_tickers() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if tickers.is_empty() {
        eprintln!("No tickers found");
    } else {
        for ticker in &tickers {
            println!("{}", ticker);
        }
        eprintln!("{} tickers found", tickers.len());
    }
    ExitCode::SUCCESS
}
