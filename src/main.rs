use iotrace::output::{
    print_latency_summary, print_operation_breakdown, read_latency_summary,
    save_access_pattern_chart, save_latency_distribution_chart, save_latency_report_json,
    save_records_to_csv, ChartConfig,
};
use iotrace::parsers::{load_io_log_with, LoadOptions};
use iotrace::utils::constants::{
    DEFAULT_HISTOGRAM_BINS, DEFAULT_IO_LOG, LATENCY_DISTRIBUTION_JSON, RECORDS_CSV,
};
use iotrace::utils::{filter_records, parse_range, Logger, RecordFilter};
use iotrace::{log, log_error, LoadStats, TraceRecord};
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

const NO_IO_OPERATIONS: &str = "No I/O operations found!";
const NO_READ_OPERATIONS: &str = "No read operations found!";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    AccessPattern,
    Latency,
    All,
}

impl Mode {
    fn parse_str(s: &str) -> Option<Self> {
        match s {
            "access-pattern" | "access" => Some(Mode::AccessPattern),
            "latency" => Some(Mode::Latency),
            "all" => Some(Mode::All),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct CliOptions {
    mode: Mode,
    io_log: PathBuf,
    output_dir: PathBuf,
    bins: usize,
    filter: RecordFilter,
    load: LoadOptions,
    export_csv: bool,
    export_json: bool,
}

fn print_usage(program: &str) {
    eprintln!("Usage:");
    eprintln!("  {program} [options] access-pattern [io_log]  - LBA vs arrival time scatter (access_pattern.png)");
    eprintln!("  {program} [options] latency [io_log]         - Read latency histogram (latency_distribution.png)");
    eprintln!("  {program} [options] all [io_log]             - Both charts from a single load");
    eprintln!("    io_log defaults to '{DEFAULT_IO_LOG}' in the current directory ('.gz' is decompressed)");
    eprintln!("\nOptions:");
    eprintln!("  -o <dir>     - Output directory for charts and exports (default: .)");
    eprintln!("  -b <bins>    - Number of latency histogram bins (default: {DEFAULT_HISTOGRAM_BINS})");
    eprintln!("  -t <lo:hi>   - Keep records whose normalized arrival time (ns) is in [lo, hi]");
    eprintln!("  -a <lo:hi>   - Keep records whose byte address is in [lo, hi]");
    eprintln!("  --strict     - Fail on the first malformed line instead of skipping it");
    eprintln!("  --csv        - Export normalized records to {RECORDS_CSV}");
    eprintln!("  --json       - Export the latency summary to {LATENCY_DISTRIBUTION_JSON}");
}

fn option_value<'a>(args: &'a [String], i: usize, option: &str) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{option} option requires a value"))
}

fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut mode = None;
    let mut io_log = None;
    let mut output_dir = PathBuf::from(".");
    let mut bins = DEFAULT_HISTOGRAM_BINS;
    let mut filter = RecordFilter::default();
    let mut load = LoadOptions::default();
    let mut export_csv = false;
    let mut export_json = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" => {
                output_dir = PathBuf::from(option_value(args, i, "-o")?);
                i += 2; // 옵션과 값을 건너뜀
            }
            "-b" => {
                let value = option_value(args, i, "-b")?;
                bins = match value.parse::<usize>() {
                    Ok(n) if n >= 1 => n,
                    _ => return Err(format!("Invalid bin count '{value}'")),
                };
                i += 2;
            }
            "-t" => {
                filter = filter.with_time_range(parse_range(option_value(args, i, "-t")?)?);
                i += 2;
            }
            "-a" => {
                filter = filter.with_address_range(parse_range(option_value(args, i, "-a")?)?);
                i += 2;
            }
            "--strict" => {
                load = LoadOptions::strict();
                i += 1;
            }
            "--csv" => {
                export_csv = true;
                i += 1;
            }
            "--json" => {
                export_json = true;
                i += 1;
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option '{arg}'"));
            }
            arg => {
                if mode.is_none() {
                    mode = Some(Mode::parse_str(arg).ok_or_else(|| format!("Unknown mode '{arg}'"))?);
                } else if io_log.is_none() {
                    io_log = Some(PathBuf::from(arg));
                } else {
                    return Err(format!("Unexpected argument '{arg}'"));
                }
                i += 1;
            }
        }
    }

    Ok(CliOptions {
        mode: mode.ok_or("No mode given")?,
        io_log: io_log.unwrap_or_else(|| PathBuf::from(DEFAULT_IO_LOG)),
        output_dir,
        bins,
        filter,
        load,
        export_csv,
        export_json,
    })
}

// 빈 집합이면 1 반환
fn run_access_pattern(
    records: &[TraceRecord],
    stats: &LoadStats,
    options: &CliOptions,
    config: &ChartConfig,
) -> i32 {
    if records.is_empty() {
        log!("{NO_IO_OPERATIONS}");
        return 1;
    }

    print_operation_breakdown(records, stats);

    match save_access_pattern_chart(records, &options.output_dir, config) {
        Ok(_) => 0,
        Err(e) => {
            log_error!("Error generating access pattern chart: {e}");
            1
        }
    }
}

fn run_latency(records: &[TraceRecord], options: &CliOptions, config: &ChartConfig) -> i32 {
    let Some(summary) = read_latency_summary(records, options.bins) else {
        log!("{NO_READ_OPERATIONS}");
        return 1;
    };

    print_latency_summary(&summary);

    if options.export_json {
        let json_path = options.output_dir.join(LATENCY_DISTRIBUTION_JSON);
        match save_latency_report_json(&summary, &json_path) {
            Ok(()) => log!("Latency summary saved as '{}'", json_path.display()),
            Err(e) => log_error!("Error exporting latency summary: {e}"),
        }
    }

    match save_latency_distribution_chart(&summary, &options.output_dir, config) {
        Ok(_) => 0,
        Err(e) => {
            log_error!("Error generating latency distribution chart: {e}");
            1
        }
    }
}

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("iotrace");

    let options = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {e}");
            print_usage(program);
            process::exit(1);
        }
    };

    fs::create_dir_all(&options.output_dir)?;
    Logger::init(&options.output_dir);

    let loaded = match load_io_log_with(&options.io_log, &options.load) {
        Ok(loaded) => loaded,
        Err(e) => {
            log_error!("Failed to load '{}': {e}", options.io_log.display());
            Logger::flush()?;
            process::exit(1);
        }
    };

    let records = filter_records(loaded.records, &options.filter);
    if options.filter.is_active() {
        log!("Records after filtering: {}", records.len());
    }

    if options.export_csv {
        let csv_path = options.output_dir.join(RECORDS_CSV);
        match save_records_to_csv(&records, &csv_path) {
            Ok(()) => log!("Records exported to '{}'", csv_path.display()),
            Err(e) => log_error!("Error exporting records to CSV: {e}"),
        }
    }

    let config = ChartConfig::default();
    let status = match options.mode {
        Mode::AccessPattern => run_access_pattern(&records, &loaded.stats, &options, &config),
        Mode::Latency => run_latency(&records, &options, &config),
        Mode::All => {
            let access = run_access_pattern(&records, &loaded.stats, &options, &config);
            log!("");
            let latency = run_latency(&records, &options, &config);
            access.max(latency)
        }
    };

    Logger::flush()?;
    if status != 0 {
        process::exit(status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use iotrace::utils::constants::{ACCESS_PATTERN_PNG, LATENCY_DISTRIBUTION_PNG};

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let options = parse_args(&args(&["latency"])).unwrap();
        assert_eq!(options.mode, Mode::Latency);
        assert_eq!(options.io_log, PathBuf::from("io_log"));
        assert_eq!(options.output_dir, PathBuf::from("."));
        assert_eq!(options.bins, 20);
        assert!(!options.filter.is_active());
        assert!(!options.export_csv);
    }

    #[test]
    fn test_all_options() {
        let options = parse_args(&args(&[
            "-o", "out", "-b", "10", "-t", "100:200", "-a", ":4096", "--strict", "--csv",
            "--json", "all", "trace.gz",
        ]))
        .unwrap();
        assert_eq!(options.mode, Mode::All);
        assert_eq!(options.io_log, PathBuf::from("trace.gz"));
        assert_eq!(options.output_dir, PathBuf::from("out"));
        assert_eq!(options.bins, 10);
        assert_eq!((options.filter.start_time, options.filter.end_time), (100, 200));
        assert_eq!(options.filter.end_address, 4096);
        assert_eq!(options.load.policy, iotrace::MalformedLinePolicy::Reject);
        assert!(options.export_csv && options.export_json);
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["plot"])).is_err());
        assert!(parse_args(&args(&["latency", "-b", "0"])).is_err());
        assert!(parse_args(&args(&["latency", "-b"])).is_err());
        assert!(parse_args(&args(&["latency", "--verbose"])).is_err());
        assert!(parse_args(&args(&["latency", "a", "b"])).is_err());
    }

    #[test]
    fn test_empty_set_messages() {
        assert_eq!(NO_READ_OPERATIONS, "No read operations found!");
        assert_eq!(NO_IO_OPERATIONS, "No I/O operations found!");
    }

    #[test]
    fn test_latency_without_reads_fails() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_str().unwrap();
        let loaded = iotrace::parsers::parse_io_log_bytes(
            b"1,0,10,0,0\n1,5,10,8,0\n",
            &LoadOptions::default(),
        )
        .unwrap();
        let options = parse_args(&args(&["-o", out, "--json", "latency"])).unwrap();

        assert_eq!(run_latency(&loaded.records, &options, &ChartConfig::default()), 1);
        assert!(!dir.path().join(LATENCY_DISTRIBUTION_PNG).exists());
        assert!(!dir.path().join(LATENCY_DISTRIBUTION_JSON).exists());
    }

    #[test]
    fn test_access_pattern_without_records_fails() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_str().unwrap();
        let options = parse_args(&args(&["-o", out, "access-pattern"])).unwrap();

        let status = run_access_pattern(&[], &LoadStats::default(), &options, &ChartConfig::default());
        assert_eq!(status, 1);
        assert!(!dir.path().join(ACCESS_PATTERN_PNG).exists());
    }
}
