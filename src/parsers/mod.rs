pub mod io_log;

pub use io_log::{
    load_io_log, load_io_log_with, parse_io_log_bytes, parse_io_log_line, LoadOptions, LoadStats,
    LoadedTrace, MalformedLinePolicy,
};
