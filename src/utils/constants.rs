// io_log 섹터 단위 (512 bytes)
pub const SECTOR_SHIFT: u32 = 9;
pub const SECTOR_SIZE: u64 = 1 << SECTOR_SHIFT;

// 나노초 -> 마이크로초 변환
pub const NANOS_PER_MICRO: f64 = 1000.0;

// 기본 입력/출력 경로
pub const DEFAULT_IO_LOG: &str = "io_log";
pub const ACCESS_PATTERN_PNG: &str = "access_pattern.png";
pub const LATENCY_DISTRIBUTION_PNG: &str = "latency_distribution.png";
pub const LATENCY_DISTRIBUTION_JSON: &str = "latency_distribution.json";
pub const RECORDS_CSV: &str = "io_records.csv";
pub const RESULT_LOG: &str = "iotrace_result.log";

pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

// 14 x 8 inch figure @ 300 DPI
pub const DEFAULT_DPI: u32 = 300;
pub const DEFAULT_FIGURE_SIZE_INCHES: (f64, f64) = (14.0, 8.0);
