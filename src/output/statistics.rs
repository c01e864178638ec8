use crate::log;
use crate::models::{Operation, TraceRecord};
use crate::parsers::LoadStats;
use serde::Serialize;

/// One histogram bucket, bounds in microseconds.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower_us: f64,
    pub upper_us: f64,
    pub count: usize,
}

/// Latency summary of one operation kind.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LatencySummary {
    pub operation: String,
    pub min_us: f64,
    pub max_us: f64,
    pub count: usize,
    pub bins: Vec<HistogramBin>,
}

// min/max 추적용 헬퍼
struct LatencyStats {
    values: Vec<f64>,
    min: f64,
    max: f64,
}

impl LatencyStats {
    fn new() -> Self {
        Self {
            values: Vec::new(),
            min: f64::MAX,
            max: f64::MIN,
        }
    }

    fn add(&mut self, value: f64) {
        self.values.push(value);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// `bins + 1` evenly spaced edges from `min` to `max`, last edge exactly `max`.
pub fn linear_bin_edges(min: f64, max: f64, bins: usize) -> Vec<f64> {
    let step = (max - min) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| min + i as f64 * step).collect();
    edges.push(max);
    edges
}

/// Equal-width histogram over `[min, max]` of the values.
///
/// Every bin is half-open except the last, which also takes `max`. When all
/// values are equal the edges collapse and everything lands in the last bin.
/// Returns `None` for an empty input or zero bins.
pub fn latency_histogram(values: &[f64], bins: usize) -> Option<Vec<HistogramBin>> {
    if values.is_empty() || bins == 0 {
        return None;
    }

    let min = values.iter().copied().fold(f64::MAX, f64::min);
    let max = values.iter().copied().fold(f64::MIN, f64::max);
    let edges = linear_bin_edges(min, max, bins);
    let mut counts = vec![0usize; bins];

    let width = max - min;
    for &value in values {
        let index = if width > 0.0 {
            let mut index = (((value - min) / width) * bins as f64) as usize;
            index = index.min(bins - 1);
            // 부동소수점 오차 보정: 실제 edge 기준으로 한 칸씩 조정
            if index > 0 && value < edges[index] {
                index -= 1;
            } else if index < bins - 1 && value >= edges[index + 1] {
                index += 1;
            }
            index
        } else {
            bins - 1
        };
        counts[index] += 1;
    }

    Some(
        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower_us: edges[i],
                upper_us: edges[i + 1],
                count,
            })
            .collect(),
    )
}

/// Elapsed-time summary of the records of one operation, in microseconds.
///
/// `None` when no record has that operation; callers report that case
/// instead of computing over an empty set.
pub fn latency_summary(
    records: &[TraceRecord],
    operation: Operation,
    bins: usize,
) -> Option<LatencySummary> {
    let mut stats = LatencyStats::new();
    for record in records.iter().filter(|r| r.operation() == operation) {
        stats.add(record.elapsed_us());
    }

    let histogram = latency_histogram(&stats.values, bins)?;

    Some(LatencySummary {
        operation: operation.display_name(),
        min_us: stats.min,
        max_us: stats.max,
        count: stats.values.len(),
        bins: histogram,
    })
}

pub fn read_latency_summary(records: &[TraceRecord], bins: usize) -> Option<LatencySummary> {
    latency_summary(records, Operation::Read, bins)
}

pub fn format_bin_line(index: usize, bin: &HistogramBin) -> String {
    format!(
        "Bin {:2}: [{:8.2} - {:8.2}] us: {:5} commands",
        index + 1,
        bin.lower_us,
        bin.upper_us,
        bin.count
    )
}

pub fn print_latency_summary(summary: &LatencySummary) {
    log!("Min latency: {:.2} us", summary.min_us);
    log!("Max latency: {:.2} us", summary.max_us);
    log!(
        "Total {} commands: {}",
        summary.operation.to_lowercase(),
        summary.count
    );

    log!("\nLatency distribution ({} bins):", summary.bins.len());
    for (i, bin) in summary.bins.iter().enumerate() {
        log!("{}", format_bin_line(i, bin));
    }
}

/// Counts records per operation: (write, read, other).
pub fn count_operations(records: &[TraceRecord]) -> (usize, usize, usize) {
    records
        .iter()
        .fold((0, 0, 0), |(w, r, o), record| match record.operation() {
            Operation::Write => (w + 1, r, o),
            Operation::Read => (w, r + 1, o),
            Operation::Other(_) => (w, r, o + 1),
        })
}

pub fn print_operation_breakdown(records: &[TraceRecord], stats: &LoadStats) {
    let (writes, reads, others) = count_operations(records);

    log!("Total lines: {}", stats.total_lines);
    log!("Malformed lines skipped: {}", stats.malformed_lines);
    log!("Total records: {}", records.len());
    log!("Write operations: {writes}");
    log!("Read operations: {reads}");
    if others > 0 {
        // 차트에는 그려지지 않는 kind
        log!("Other operations (not plotted): {others}");
    }
}
