pub mod constants;
pub mod filter;
pub mod logger;

pub use self::filter::{filter_records, parse_range, RecordFilter};
pub use self::logger::Logger;
