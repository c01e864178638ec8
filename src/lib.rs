pub mod models;
pub mod output;
pub mod parsers;
pub mod processors;
pub mod utils;

// 주요 기능 재내보내기(re-exporting)
pub use models::{Operation, RawTraceRecord, TraceRecord};
pub use output::{
    print_latency_summary, read_latency_summary, save_access_pattern_chart,
    save_latency_distribution_chart, ChartConfig, LatencySummary,
};
pub use parsers::{load_io_log, load_io_log_with, LoadOptions, LoadStats, LoadedTrace, MalformedLinePolicy};
pub use processors::normalize_records;
