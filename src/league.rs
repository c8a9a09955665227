use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

/// The two wire shapes the supported leagues publish play-by-play in.
/// `GcVerbose` is the flat per-event-type format (tab=pxpverbose);
/// `Statview` nests everything under a single `details` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFamily {
    GcVerbose,
    Statview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum League {
    Qmjhl,
    Ohl,
    Whl,
    Ahl,
    Pwhl,
}

impl League {
    pub const ALL: [League; 5] = [
        League::Qmjhl,
        League::Ohl,
        League::Whl,
        League::Ahl,
        League::Pwhl,
    ];

    pub fn wire_family(self) -> WireFamily {
        match self {
            League::Qmjhl | League::Ohl | League::Whl => WireFamily::GcVerbose,
            League::Ahl | League::Pwhl => WireFamily::Statview,
        }
    }

    /// Uppercase tag stored on every canonical row.
    pub fn code(self) -> &'static str {
        match self {
            League::Qmjhl => "QMJHL",
            League::Ohl => "OHL",
            League::Whl => "WHL",
            League::Ahl => "AHL",
            League::Pwhl => "PWHL",
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for League {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "qmjhl" | "lhjmq" => Ok(League::Qmjhl),
            "ohl" => Ok(League::Ohl),
            "whl" => Ok(League::Whl),
            "ahl" => Ok(League::Ahl),
            "pwhl" => Ok(League::Pwhl),
            other => Err(Error::UnsupportedLeague(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_league_codes_case_insensitively() {
        assert_eq!("QMJHL".parse::<League>().unwrap(), League::Qmjhl);
        assert_eq!("lhjmq".parse::<League>().unwrap(), League::Qmjhl);
        assert_eq!("Pwhl".parse::<League>().unwrap(), League::Pwhl);
        assert!("khl".parse::<League>().is_err());
    }

    #[test]
    fn wire_families_split_as_expected() {
        assert_eq!(League::Whl.wire_family(), WireFamily::GcVerbose);
        assert_eq!(League::Ahl.wire_family(), WireFamily::Statview);
        assert_eq!(League::Pwhl.wire_family(), WireFamily::Statview);
    }
}
