//! Report output port trait.

use crate::domain::error::StratlabError;
use crate::domain::pipeline::BacktestReport;
use std::path::Path;

/// Port for handing a finished backtest to a presentation layer.
pub trait ReportPort {
    fn write(&self, report: &BacktestReport, output_path: &Path) -> Result<(), StratlabError>;
}
