// io_log loader: "<kind>,<arrival_ns>,<elapsed_ns>,<lba>,<block_count>" per line

use crate::log;
use crate::models::{RawTraceRecord, TraceRecord};
use crate::processors::normalize_records;
use flate2::read::GzDecoder;
use lazy_static::lazy_static;
use memchr::memchr_iter;
use memmap2::MmapOptions;
use regex::Regex;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::time::Instant;

lazy_static! {
    // 정확히 5개의 정수 필드, 필드 양쪽 공백은 허용
    pub static ref IO_LOG_RE: Regex = Regex::new(
        r"^\s*(?P<kind>[+-]?[0-9]+)\s*,\s*(?P<arrival>[+-]?[0-9]+)\s*,\s*(?P<elapsed>[+-]?[0-9]+)\s*,\s*(?P<lba>[+-]?[0-9]+)\s*,\s*(?P<count>[+-]?[0-9]+)\s*$"
    )
    .unwrap();
}

/// What to do with a line that is not a valid record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedLinePolicy {
    /// Drop the line and count it in `LoadStats::malformed_lines`.
    #[default]
    Skip,
    /// Fail the whole load with `InvalidData`.
    Reject,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    pub policy: MalformedLinePolicy,
}

impl LoadOptions {
    pub fn strict() -> Self {
        Self {
            policy: MalformedLinePolicy::Reject,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub total_lines: usize,
    pub malformed_lines: usize,
}

impl LoadStats {
    pub fn parsed_lines(&self) -> usize {
        self.total_lines - self.malformed_lines
    }
}

/// Normalized records plus the counters of the pass that produced them.
#[derive(Debug, Clone, Default)]
pub struct LoadedTrace {
    pub records: Vec<TraceRecord>,
    pub stats: LoadStats,
}

// 모든 필드는 i128로 읽음 (음수 포함)
fn parse_field(token: &str) -> Option<i128> {
    token.parse::<i128>().ok()
}

/// Parses one io_log line into a raw record (sector units, absolute time).
///
/// Any five integers are accepted. A line is rejected only when it does not
/// match the grammar, a field does not fit in `i128`, or the byte conversion
/// of the block address/count would leave `i128`.
pub fn parse_io_log_line(line: &str) -> Result<RawTraceRecord, &'static str> {
    let caps = IO_LOG_RE
        .captures(line)
        .ok_or("Line does not match io_log pattern")?;

    let kind = parse_field(&caps["kind"]).ok_or("Operation kind out of range")?;
    let arrival_time = parse_field(&caps["arrival"]).ok_or("Arrival time out of range")?;
    let elapsed_time = parse_field(&caps["elapsed"]).ok_or("Elapsed time out of range")?;
    let block_address = parse_field(&caps["lba"]).ok_or("Block address out of range")?;
    let block_count = parse_field(&caps["count"]).ok_or("Block count out of range")?;

    RawTraceRecord::new(kind, arrival_time, elapsed_time, block_address, block_count)
        .ok_or("Block address or count overflows byte conversion")
}

// 줄 단위 분할: 마지막 개행 뒤의 빈 조각은 줄로 세지 않음
fn split_lines(data: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut start = 0;
    let mut ends = memchr_iter(b'\n', data).map(Some).chain(std::iter::once(None));

    std::iter::from_fn(move || match ends.next()? {
        Some(end) => {
            let line = &data[start..end];
            start = end + 1;
            Some(line)
        }
        None if start < data.len() => {
            let line = &data[start..];
            start = data.len();
            Some(line)
        }
        None => None,
    })
}

/// Parses an in-memory io_log and normalizes the result.
pub fn parse_io_log_bytes(data: &[u8], options: &LoadOptions) -> io::Result<LoadedTrace> {
    let mut raw_records = Vec::new();
    let mut stats = LoadStats::default();

    for (index, line) in split_lines(data).enumerate() {
        stats.total_lines += 1;

        let parsed = std::str::from_utf8(line)
            .map_err(|_| "Line is not valid UTF-8")
            .and_then(parse_io_log_line);

        match parsed {
            Ok(raw) => raw_records.push(raw),
            Err(reason) => match options.policy {
                MalformedLinePolicy::Skip => stats.malformed_lines += 1,
                MalformedLinePolicy::Reject => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("malformed record at line {}: {reason}", index + 1),
                    ));
                }
            },
        }
    }

    Ok(LoadedTrace {
        records: normalize_records(raw_records),
        stats,
    })
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Loads and normalizes an io_log file.
///
/// A missing or unreadable file is an error; a file without a single valid
/// record is not, it just yields an empty `LoadedTrace`.
pub fn load_io_log_with<P: AsRef<Path>>(path: P, options: &LoadOptions) -> io::Result<LoadedTrace> {
    let path = path.as_ref();
    let start_time = Instant::now();
    let file = File::open(path)?;

    let loaded = if is_gzip(path) {
        let mut data = Vec::new();
        GzDecoder::new(file).read_to_end(&mut data)?;
        parse_io_log_bytes(&data, options)?
    } else if file.metadata()?.len() == 0 {
        // 길이 0인 파일은 mmap 할 수 없음
        parse_io_log_bytes(&[], options)?
    } else {
        // SAFETY: the map is read-only and dropped before this function returns.
        let mmap = unsafe { MmapOptions::new().map(&file)? };
        parse_io_log_bytes(&mmap, options)?
    };

    log!(
        "Loaded {} records from '{}' ({} lines, {} malformed skipped) in {:.3}s",
        loaded.records.len(),
        path.display(),
        loaded.stats.total_lines,
        loaded.stats.malformed_lines,
        start_time.elapsed().as_secs_f64()
    );

    Ok(loaded)
}

/// `load_io_log_with` using the default skip-malformed policy.
pub fn load_io_log<P: AsRef<Path>>(path: P) -> io::Result<Vec<TraceRecord>> {
    load_io_log_with(path, &LoadOptions::default()).map(|loaded| loaded.records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Operation;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(text: &str) -> LoadedTrace {
        parse_io_log_bytes(text.as_bytes(), &LoadOptions::default()).unwrap()
    }

    #[test]
    fn test_parse_line() {
        let raw = parse_io_log_line("2,1000,500,10,1").unwrap();
        assert_eq!(raw.kind(), 2);
        assert_eq!(raw.arrival_time(), 1000);
        assert_eq!(raw.elapsed_time(), 500);
        assert_eq!(raw.block_address(), 10);
        assert_eq!(raw.block_count(), 1);

        assert!(parse_io_log_line(" 1, 2 ,3,4,5\r").is_ok());
        assert!(parse_io_log_line("1,-20,3,4,5").is_ok());
    }

    #[test]
    fn test_parse_line_rejects_malformed() {
        assert!(parse_io_log_line("1,100,50").is_err());
        assert!(parse_io_log_line("1,100,50,1,2,3").is_err());
        assert!(parse_io_log_line("1,100,5x,1,2").is_err());
        assert!(parse_io_log_line("1,100,1.5,1,2").is_err());
        assert!(parse_io_log_line("1,1 00,5,1,2").is_err());
        assert!(parse_io_log_line("").is_err());
        // i128 범위 밖 필드, 바이트 변환 오버플로우
        assert!(parse_io_log_line("1,1000000000000000000000000000000000000000,5,1,2").is_err());
        assert!(parse_io_log_line("1,100,5,170141183460469231731687303715884105727,2").is_err());
    }

    #[test]
    fn test_parse_line_accepts_any_integers() {
        let raw = parse_io_log_line("-7,-20,-5,-1,-1").unwrap();
        assert_eq!(raw.kind(), -7);
        assert_eq!(raw.arrival_time(), -20);
        assert_eq!(raw.elapsed_time(), -5);
        assert_eq!(raw.byte_address(), -512);
        assert_eq!(raw.byte_size(), 0);

        let raw = parse_io_log_line("+1,99999999999999999999,7,18446744073709551615,1").unwrap();
        assert_eq!(raw.arrival_time(), 99_999_999_999_999_999_999);
        assert_eq!(raw.byte_address(), 18_446_744_073_709_551_615 * 512);
    }

    #[test]
    fn test_negative_and_wide_fields_are_kept() {
        let loaded = parse(
            "2,1000,-5,10,1\n1,2000,700,-1,3\n1,99999999999999999999,7,1,1\n2,3000,10,1,-1\n",
        );
        assert_eq!(loaded.stats.total_lines, 4);
        assert_eq!(loaded.stats.malformed_lines, 0);
        assert_eq!(loaded.records.len(), 4);

        let records = &loaded.records;
        assert_eq!(records[0].elapsed_time(), -5);
        assert_eq!(records[0].address(), 5120);
        assert_eq!(records[1].arrival_time(), 1000);
        assert_eq!(records[1].address(), -512);
        assert_eq!(records[2].arrival_time(), 2000);
        assert_eq!(records[2].size(), 0);
        assert_eq!(records[3].arrival_time(), 99_999_999_999_999_998_999);
        assert_eq!(records[3].operation(), Operation::Write);
    }

    #[test]
    fn test_read_and_write_scenario() {
        let loaded = parse("2,1000,500,10,1\n1,2000,700,20,3\n");
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.stats.total_lines, 2);
        assert_eq!(loaded.stats.malformed_lines, 0);

        let read = loaded.records[0];
        assert_eq!(read.operation(), Operation::Read);
        assert_eq!(read.arrival_time(), 0);
        assert_eq!(read.address(), 5120);
        assert_eq!(read.size(), 1024);

        let write = loaded.records[1];
        assert_eq!(write.operation(), Operation::Write);
        assert_eq!(write.arrival_time(), 1000);
        assert_eq!(write.address(), 10240);
        assert_eq!(write.size(), 2048);
    }

    #[test]
    fn test_short_line_is_skipped() {
        let loaded = parse("1,300,10,1,0\n1,100,50\n2,200,10,2,0\n");
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.stats.malformed_lines, 1);
        assert_eq!(loaded.stats.parsed_lines(), loaded.records.len());

        // 인접한 줄의 파싱에는 영향 없음
        assert_eq!(loaded.records[0].address(), 1024);
        assert_eq!(loaded.records[1].address(), 512);
    }

    #[test]
    fn test_line_counting() {
        assert_eq!(parse("").stats.total_lines, 0);
        assert_eq!(parse("1,0,0,0,0").stats.total_lines, 1);
        assert_eq!(parse("1,0,0,0,0\n").stats.total_lines, 1);

        // 빈 줄은 malformed로 집계
        let loaded = parse("1,0,0,0,0\n\n2,5,0,0,0\r\n");
        assert_eq!(loaded.stats.total_lines, 3);
        assert_eq!(loaded.stats.malformed_lines, 1);
        assert_eq!(loaded.records.len(), 2);
    }

    #[test]
    fn test_invalid_utf8_line_is_malformed() {
        let data = b"1,0,0,0,0\n\xff\xfe,1,2,3,4\n2,1,0,0,0\n";
        let loaded = parse_io_log_bytes(data, &LoadOptions::default()).unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.stats.malformed_lines, 1);
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let loaded = parse("3,10,0,0,0\n2,20,0,0,0\n");
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[0].operation(), Operation::Other(3));
    }

    #[test]
    fn test_reject_policy_names_line() {
        let err = parse_io_log_bytes(b"1,0,0,0,0\nbad\n", &LoadOptions::strict()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "1,5000,10,8,7\n2,4000,20,16,0\ngarbage\n").unwrap();
        file.flush().unwrap();

        let loaded = load_io_log_with(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(loaded.stats.total_lines, 3);
        assert_eq!(loaded.stats.malformed_lines, 1);
        assert_eq!(loaded.records[0].operation(), Operation::Read);
        assert_eq!(loaded.records[0].arrival_time(), 0);
        assert_eq!(loaded.records[1].arrival_time(), 1000);
        assert_eq!(loaded.records[1].size(), 4096);
    }

    #[test]
    fn test_load_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let records = load_io_log(file.path()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_gzip_file() {
        let file = tempfile::Builder::new().suffix(".gz").tempfile().unwrap();
        let mut encoder = GzEncoder::new(file.reopen().unwrap(), Compression::default());
        encoder.write_all(b"2,1000,500,10,1\n1,2000,700,20,3\n").unwrap();
        encoder.finish().unwrap();

        let records = load_io_log(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].address(), 10240);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_io_log(dir.path().join("io_log")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
