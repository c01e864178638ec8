use crate::models::{RawTraceRecord, TraceRecord};

/// Sorts raw records by arrival time and shifts the time origin to the
/// earliest one.
///
/// The sort is stable, so records sharing an arrival time keep their file
/// order. An empty input gives an empty output.
pub fn normalize_records(mut raw_records: Vec<RawTraceRecord>) -> Vec<TraceRecord> {
    // 1. arrival time 기준 정렬 (stable)
    raw_records.sort_by_key(|raw| raw.arrival_time());

    // 2. 가장 빠른 arrival time을 0으로
    let Some(min_time) = raw_records.first().map(|raw| raw.arrival_time()) else {
        return Vec::new();
    };

    raw_records
        .iter()
        .map(|raw| TraceRecord::from_raw(raw, min_time))
        .collect()
}
