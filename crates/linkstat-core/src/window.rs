use crate::error::UnknownWindow;
use std::fmt::Display;
use std::str::FromStr;

/// A counting granularity for hit statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    /// A single bucket that is never rolled over.
    AllTime,
    Minute,
    Day,
    Week,
}

impl Window {
    /// Every window, in the order counters are updated on a hit.
    pub const ALL: [Window; 4] = [Window::AllTime, Window::Minute, Window::Day, Window::Week];

    /// Bucket width in seconds; `0` means no bucketing.
    pub const fn duration_secs(self) -> i64 {
        match self {
            Window::AllTime => 0,
            Window::Minute => 60,
            Window::Day => 86_400,
            Window::Week => 604_800,
        }
    }

    /// The canonical name accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Window::AllTime => "alltime",
            Window::Minute => "minute",
            Window::Day => "day",
            Window::Week => "week",
        }
    }
}

impl Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Window {
    type Err = UnknownWindow;

    /// Parses a window name. `24h` is accepted as an alias of `day`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alltime" => Ok(Window::AllTime),
            "minute" => Ok(Window::Minute),
            "day" | "24h" => Ok(Window::Day),
            "week" => Ok(Window::Week),
            other => Err(UnknownWindow(other.to_string())),
        }
    }
}
