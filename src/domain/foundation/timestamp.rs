//! UTC timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in time, always UTC. Serializes as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn orders_chronologically() {
        let upload = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
        let export = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 1, 1, 9, 5, 0).unwrap());
        assert!(upload < export);
        assert_eq!(export.as_datetime().signed_duration_since(*upload.as_datetime()).num_minutes(), 5);
    }

    #[test]
    fn displays_as_rfc3339() {
        let ts = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap());
        assert_eq!(ts.to_string(), "2024-03-05T10:00:00+00:00");
    }

    #[test]
    fn serializes_as_string() {
        let ts = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap());
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"2024-03-05T10:00:00Z\"");
    }
}
