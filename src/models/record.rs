use super::Operation;
use crate::utils::constants::SECTOR_SIZE;
use serde::Serialize;

const SECTOR_BYTES: i128 = SECTOR_SIZE as i128;

/// One io_log line as stored on disk: sector units, absolute timestamp.
///
/// Every field is kept as a signed 128-bit integer, so any integer the log
/// can hold in that range is accepted, negative values included. The only
/// rejection is a sector field whose byte conversion leaves `i128`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTraceRecord {
    kind: i128,
    arrival_time: i128,
    elapsed_time: i128,
    block_address: i128,
    block_count: i128,
}

impl RawTraceRecord {
    pub fn new(
        kind: i128,
        arrival_time: i128,
        elapsed_time: i128,
        block_address: i128,
        block_count: i128,
    ) -> Option<Self> {
        // 바이트 변환 시 i128 범위를 벗어나는 값만 거부
        block_address.checked_mul(SECTOR_BYTES)?;
        block_count.checked_add(1)?.checked_mul(SECTOR_BYTES)?;

        Some(Self {
            kind,
            arrival_time,
            elapsed_time,
            block_address,
            block_count,
        })
    }

    pub fn kind(&self) -> i128 {
        self.kind
    }

    pub fn arrival_time(&self) -> i128 {
        self.arrival_time
    }

    pub fn elapsed_time(&self) -> i128 {
        self.elapsed_time
    }

    pub fn block_address(&self) -> i128 {
        self.block_address
    }

    pub fn block_count(&self) -> i128 {
        self.block_count
    }

    /// Byte offset: block address × 512
    pub fn byte_address(&self) -> i128 {
        self.block_address * SECTOR_BYTES
    }

    /// Byte length: (block count + 1) × 512
    pub fn byte_size(&self) -> i128 {
        (self.block_count + 1) * SECTOR_BYTES
    }
}

/// Normalized trace record: bytes and nanoseconds, arrival time relative to
/// the earliest record of the loaded set.
///
/// Values are carried through as logged; a negative elapsed time or address
/// in the input stays negative here.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRecord {
    operation: Operation,
    arrival_time: u128, // ns, 로드된 집합의 최소 arrival 기준
    elapsed_time: i128, // ns
    address: i128,      // bytes
    size: i128,         // bytes
}

impl TraceRecord {
    /// Builds the normalized record from a raw one.
    ///
    /// `min_time` must be the minimum arrival time of the set `raw` belongs
    /// to; for `min_time > raw.arrival_time()` the offset is meaningless.
    /// Only `normalize_records` calls this, after sorting.
    pub(crate) fn from_raw(raw: &RawTraceRecord, min_time: i128) -> Self {
        debug_assert!(raw.arrival_time() >= min_time);

        Self {
            operation: Operation::from_kind(raw.kind()),
            arrival_time: raw.arrival_time().abs_diff(min_time),
            elapsed_time: raw.elapsed_time(),
            address: raw.byte_address(),
            size: raw.byte_size(),
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn arrival_time(&self) -> u128 {
        self.arrival_time
    }

    pub fn elapsed_time(&self) -> i128 {
        self.elapsed_time
    }

    pub fn address(&self) -> i128 {
        self.address
    }

    pub fn size(&self) -> i128 {
        self.size
    }

    // 화면 표시용 (ns -> us)
    pub fn elapsed_us(&self) -> f64 {
        self.elapsed_time as f64 / crate::utils::constants::NANOS_PER_MICRO
    }
}
