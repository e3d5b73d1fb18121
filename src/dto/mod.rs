use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod board;
pub mod health;
pub mod profile;
pub mod search;
pub mod session;
pub mod social;

/// Current wall-clock time as an RFC 3339 string, the format relationship
/// records carry.
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
