//! CSV rendering of a column plan plus its flattened rows.

use crate::error::{PayloadError, PayloadResult};
use crate::payload::flatten::FlatRow;

/// Render (plan, rows) into one CSV blob.
///
/// Header row first, then one line per row with absent values as empty
/// fields. Fields containing the delimiter, a quote, or a newline are
/// double-quoted with embedded quotes doubled. Records are separated by
/// `\n` with no trailing newline after the last row.
pub fn encode_csv(plan: &[String], rows: &[FlatRow]) -> PayloadResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(plan)?;

    for row in rows {
        writer.write_record(plan.iter().map(|column| row.value(column).unwrap_or("")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| PayloadError::Encode(err.to_string()))?;
    let mut text =
        String::from_utf8(bytes).map_err(|err| PayloadError::Encode(err.to_string()))?;

    // The writer terminates every record; the wire format expects the blob
    // to end after the last row.
    if text.ends_with('\n') {
        text.pop();
    }

    Ok(text)
}
