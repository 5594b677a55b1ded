//! Export document writer.

use crate::clock::format_iso8601_utc;
use crate::transfer::TransferFormat;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Serialized export ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    /// Pretty-printed JSON document.
    pub contents: String,
}

#[derive(Debug)]
pub struct ExportError(serde_json::Error);

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to serialize export document: {}", self.0)
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

// Field order is `exportedAt` first, then the wrapper array.
struct ExportDocument<'a, R> {
    exported_at: String,
    wrapper_field: &'static str,
    records: &'a [R],
}

impl<R: Serialize> Serialize for ExportDocument<'_, R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("exportedAt", &self.exported_at)?;
        map.serialize_entry(self.wrapper_field, self.records)?;
        map.end()
    }
}

/// Builds `{ "exportedAt": <ISO-8601>, "<wrapper>": [records] }`.
pub fn export_records<R: Serialize>(
    records: &[R],
    format: &TransferFormat,
    now_ms: i64,
) -> Result<ExportFile, ExportError> {
    let document = ExportDocument {
        exported_at: format_iso8601_utc(now_ms),
        wrapper_field: format.wrapper_field,
        records,
    };
    let contents = serde_json::to_string_pretty(&document).map_err(ExportError)?;
    Ok(ExportFile {
        file_name: format.file_name.to_string(),
        contents,
    })
}

#[cfg(test)]
mod tests {
    use super::export_records;
    use crate::transfer::TRACKER_TRANSFER;
    use serde_json::Value;

    #[test]
    fn export_writes_timestamp_and_wrapper_array() {
        let file = export_records::<u8>(&[], &TRACKER_TRANSFER, 0).expect("export");
        assert_eq!(file.file_name, "job-tracker-export.json");

        let document: Value = serde_json::from_str(&file.contents).expect("valid json");
        assert_eq!(document["exportedAt"], "1970-01-01T00:00:00.000Z");
        assert_eq!(document["apps"], Value::Array(Vec::new()));
        assert!(file.contents.find("exportedAt") < file.contents.find("apps"));
    }
}
