mod operation;
mod record;

pub use operation::Operation;
pub use record::{RawTraceRecord, TraceRecord};
