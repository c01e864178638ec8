use crate::models::TraceRecord;

/// Optional windows applied to normalized records.
///
/// A bound of 0 means "not set": `start == 0 && end == 0` disables the
/// window, `end == 0` alone leaves it open-ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub start_time: u64,    // ns, 정규화된 arrival time 기준
    pub end_time: u64,      // ns
    pub start_address: u64, // bytes
    pub end_address: u64,   // bytes
}

impl RecordFilter {
    pub fn with_time_range(mut self, (start, end): (u64, u64)) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    pub fn with_address_range(mut self, (start, end): (u64, u64)) -> Self {
        self.start_address = start;
        self.end_address = end;
        self
    }

    pub fn is_time_filter_active(&self) -> bool {
        self.start_time > 0 || self.end_time > 0
    }

    pub fn is_address_filter_active(&self) -> bool {
        self.start_address > 0 || self.end_address > 0
    }

    pub fn is_active(&self) -> bool {
        self.is_time_filter_active() || self.is_address_filter_active()
    }

    pub fn matches(&self, record: &TraceRecord) -> bool {
        within(
            record.arrival_time(),
            u128::from(self.start_time),
            u128::from(self.end_time),
        ) && within(
            record.address(),
            i128::from(self.start_address),
            i128::from(self.end_address),
        )
    }
}

// start/end 중 설정된 쪽만 검사 (0 = 미설정)
fn within<T: PartialOrd + Default>(value: T, start: T, end: T) -> bool {
    let unset = T::default();
    let lower_ok = start == unset || value >= start;
    let upper_ok = end == unset || value <= end;
    lower_ok && upper_ok
}

/// Keeps the records matching `filter`, order preserved.
pub fn filter_records(records: Vec<TraceRecord>, filter: &RecordFilter) -> Vec<TraceRecord> {
    // 필터가 비활성화된 경우 원본 그대로 반환
    if !filter.is_active() {
        return records;
    }

    records
        .into_iter()
        .filter(|record| filter.matches(record))
        .collect()
}

/// Parses an inclusive `lo:hi` window. Either side may be empty (`:hi`, `lo:`).
pub fn parse_range(input: &str) -> Result<(u64, u64), String> {
    let (lo, hi) = input
        .split_once(':')
        .ok_or_else(|| format!("Invalid range '{input}'. Expected format: start:end"))?;

    let parse_bound = |value: &str| -> Result<u64, String> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(0);
        }
        value
            .parse::<u64>()
            .map_err(|_| format!("Invalid range bound '{value}' in '{input}'"))
    };

    let start = parse_bound(lo)?;
    let end = parse_bound(hi)?;

    if end > 0 && start > end {
        return Err(format!(
            "Range start ({start}) must not be greater than end ({end})"
        ));
    }

    Ok((start, end))
}
