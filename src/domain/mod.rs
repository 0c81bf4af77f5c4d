pub mod errors;
pub mod inquiry;
pub mod ports;
pub mod quote;
pub mod status;
pub mod validation;

use chrono::{DateTime, Duration, SubsecRound, Utc};

/// Timestamp for a modification of a record last touched at `previous`.
/// Always strictly later than `previous`, even when the clock has not moved.
/// Microsecond precision, matching what PostgreSQL stores.
pub fn next_modified_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now().trunc_subsecs(6);
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
