//! Canonical content digests for Chronicle blocks
//!
//! A block's content hash is SHA-256 over the concatenation of its four
//! committed fields, each rendered in canonical text form, in the fixed
//! order `index, timestamp, message, previous_hash`, with no separators.
//! Digests are rendered as lowercase hex. Every reimplementation must
//! preserve this exact rendering for hashes to be reproducible.

use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

/// Render a timestamp in its canonical text form: RFC 3339 in UTC with a
/// fixed-width millisecond fraction and `Z` suffix, e.g.
/// `2024-01-15T09:30:00.000Z`. This matches the wire format the ledger's
/// consumers already expect.
pub fn canonical_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Truncate a timestamp to whole milliseconds.
///
/// Block timestamps are captured at this precision so the stored value and
/// its canonical rendering commit to the same instant.
pub fn truncate_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    let millis = ts.timestamp_millis();
    DateTime::from_timestamp_millis(millis).unwrap_or(ts)
}

/// Compute the content digest of a block from its committed fields.
///
/// The index is rendered in base-10 without leading zeros; the timestamp via
/// [`canonical_timestamp`]; message and previous hash are taken verbatim.
pub fn block_digest(
    index: u64,
    timestamp: &DateTime<Utc>,
    message: &str,
    previous_hash: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(index.to_string().as_bytes());
    hasher.update(canonical_timestamp(timestamp).as_bytes());
    hasher.update(message.as_bytes());
    hasher.update(previous_hash.as_bytes());
    hex::encode(hasher.finalize())
}
