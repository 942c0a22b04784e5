use linkstat_core::ShortCode;
use linkstat_stats::StatsError;
use serde::{Serialize, Serializer};

/// A freshly created mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedUrl {
    pub identifier: u64,
    pub short_code: ShortCode,
    pub long_url: String,
}

/// The outcome of resolving a short code.
#[derive(Debug)]
pub struct Resolution {
    /// Where the client should be sent.
    pub long_url: String,
    /// Whether the hit was counted. A failure here does not affect the redirect.
    pub hit: std::result::Result<(), StatsError>,
}

/// Wire value of [`HitCount::Unavailable`].
pub const UNAVAILABLE_HITS: i64 = -1;

/// Answer to a hit count query.
///
/// Queries never fail because of their arguments: an undecodable code or an
/// unknown window yields [`HitCount::Unavailable`], which serializes as `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitCount {
    Count(u64),
    Unavailable,
}

impl HitCount {
    /// The integer reported to clients.
    pub fn value(self) -> i64 {
        match self {
            HitCount::Count(n) => i64::try_from(n).unwrap_or(i64::MAX),
            HitCount::Unavailable => UNAVAILABLE_HITS,
        }
    }
}

impl Serialize for HitCount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.value())
    }
}
