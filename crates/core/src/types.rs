/// Summary identifiers are opaque strings (UUID v4 text when generated here).
pub type SummaryId = String;

/// Reports are addressed by the numeric id the backing system assigns.
pub type ReportId = i64;

/// One row of a raw report, keyed by field name.
pub type Record = serde_json::Map<String, serde_json::Value>;
