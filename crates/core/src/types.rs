/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Convert Unix epoch milliseconds (the frame's wire format) into a
/// [`Timestamp`]. Returns `None` when the value is out of range.
pub fn timestamp_from_millis(millis: i64) -> Option<Timestamp> {
    chrono::DateTime::from_timestamp_millis(millis)
}
