//! CSV report adapter: one row per date with prices, signals, returns and
//! both cumulative curves. Undefined values are written as empty cells.

use crate::domain::error::StratlabError;
use crate::domain::pipeline::BacktestReport;
use crate::domain::signal::Position;
use crate::ports::report_port::ReportPort;
use std::path::Path;

const HEADER: [&str; 7] = [
    "date",
    "adj_close",
    "signal",
    "market_return",
    "strategy_return",
    "market_cumulative",
    "strategy_cumulative",
];

pub struct CsvReportAdapter;

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn signal_cell(position: Option<Position>) -> String {
    match position {
        Some(Position::Long) => "1".to_string(),
        Some(Position::Flat) => "0".to_string(),
        None => String::new(),
    }
}

fn csv_error(e: csv::Error) -> StratlabError {
    StratlabError::Data {
        reason: format!("CSV write error: {}", e),
    }
}

impl CsvReportAdapter {
    pub fn write_to<W: std::io::Write>(
        &self,
        report: &BacktestReport,
        writer: W,
    ) -> Result<(), StratlabError> {
        let eval = &report.evaluation;
        let expected = report.prices.len();
        for actual in [
            report.signals.len(),
            eval.market_returns.len(),
            eval.strategy_returns.len(),
            eval.market_cumulative.values.len(),
            eval.strategy_cumulative.values.len(),
        ] {
            if actual != expected {
                return Err(StratlabError::SeriesLengthMismatch { expected, actual });
            }
        }

        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(HEADER).map_err(csv_error)?;

        let rows = report
            .prices
            .points()
            .iter()
            .zip(&report.signals.values)
            .zip(&eval.market_returns.values)
            .zip(&eval.strategy_returns.values)
            .zip(&eval.market_cumulative.values)
            .zip(&eval.strategy_cumulative.values);

        for (((((price, signal), market), strategy), market_cum), strategy_cum) in rows {
            wtr.write_record([
                price.date.format("%Y-%m-%d").to_string(),
                price.adjusted_close.to_string(),
                signal_cell(signal.position),
                cell(market.value),
                cell(strategy.value),
                cell(market_cum.value),
                cell(strategy_cum.value),
            ])
            .map_err(csv_error)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, report: &BacktestReport, output_path: &Path) -> Result<(), StratlabError> {
        let file = std::fs::File::create(output_path)?;
        self.write_to(report, file)?;
        tracing::info!(path = %output_path.display(), rows = report.prices.len(), "report written");
        Ok(())
    }
}
