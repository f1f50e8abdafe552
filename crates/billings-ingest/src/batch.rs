//! Splitting an inbound batch into notification lines

/// Split a raw batch on `\r\n`, `\r` and `\n`, dropping empty entries
///
/// Entries consisting only of whitespace count as empty.
pub fn split_batch(raw_batch: &str) -> impl Iterator<Item = &str> {
    raw_batch
        .split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty())
}
