pub mod charts;
pub mod csv;
pub mod report;
pub mod statistics;

pub use charts::{save_access_pattern_chart, save_latency_distribution_chart, ChartConfig};
pub use self::csv::save_records_to_csv;
pub use report::save_latency_report_json;
pub use statistics::{
    print_latency_summary, print_operation_breakdown, read_latency_summary, LatencySummary,
};
