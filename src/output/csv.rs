use crate::models::TraceRecord;
use csv::Writer;
use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes normalized records as CSV (bytes and nanoseconds).
pub fn write_records_csv<W: Write>(records: &[TraceRecord], out: W) -> Result<(), Box<dyn Error>> {
    let mut writer = Writer::from_writer(out);

    writer.write_record([
        "operation",
        "arrival_time_ns",
        "elapsed_time_ns",
        "address",
        "size",
    ])?;

    for record in records {
        writer.write_record(&[
            record.operation().display_name(),
            record.arrival_time().to_string(),
            record.elapsed_time().to_string(),
            record.address().to_string(),
            record.size().to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// CSV export of the normalized records to `path`
pub fn save_records_to_csv(records: &[TraceRecord], path: &Path) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    write_records_csv(records, file)
}
