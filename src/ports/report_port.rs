//! Report output port trait.

use crate::domain::compare::Comparison;
use crate::domain::error::ScoreError;
use crate::domain::report::TickerReport;

pub trait ReportPort {
    fn write_report(&self, report: &TickerReport, output_path: &str) -> Result<(), ScoreError>;

    fn write_comparison(&self, comparison: &Comparison, output_path: &str)
    -> Result<(), ScoreError>;
}
