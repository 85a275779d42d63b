//! Platform family classification.
//!
//! Raw platform labels (`PS2`, `X360`, `3DS`, ...) are bucketed into a small
//! set of families for the family filter. The lookup table is closed: a new
//! platform code needs a new entry here, otherwise it classifies as
//! [`PlatformFamily::Other`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

const NINTENDO: &[&str] = &[
    "SWITCH", "WII", "WIIU", "DS", "3DS", "GBA", "GC", "N64", "SNES", "NES",
];
const PLAYSTATION: &[&str] = &["PS", "PS2", "PS3", "PS4", "PS5", "PSP", "PSV"];
const XBOX: &[&str] = &["XB", "XBOX", "X360", "XONE", "XSERIES"];

/// Coarse platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlatformFamily {
    /// Nintendo consoles and handhelds.
    Nintendo,
    /// Sony consoles and handhelds.
    PlayStation,
    /// Microsoft consoles.
    Xbox,
    /// Personal computers.
    #[serde(rename = "PC")]
    Pc,
    /// Everything not in the lookup table.
    Other,
}

impl PlatformFamily {
    /// Get all family variants.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::Nintendo,
            Self::PlayStation,
            Self::Xbox,
            Self::Pc,
            Self::Other,
        ]
    }

    /// Display name, matching the selector values.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Nintendo => "Nintendo",
            Self::PlayStation => "PlayStation",
            Self::Xbox => "Xbox",
            Self::Pc => "PC",
            Self::Other => "Other",
        }
    }

    /// Parse a family name (case-insensitive).
    #[must_use]
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "nintendo" => Some(Self::Nintendo),
            "playstation" | "sony" => Some(Self::PlayStation),
            "xbox" | "microsoft" => Some(Self::Xbox),
            "pc" => Some(Self::Pc),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Map a raw platform label to its family.
///
/// Total: unknown or empty labels resolve to [`PlatformFamily::Other`].
///
/// # Example
///
/// ```
/// use genre_trends::platform::{classify, PlatformFamily};
///
/// assert_eq!(classify(" ps2 "), PlatformFamily::PlayStation);
/// assert_eq!(classify("X360"), PlatformFamily::Xbox);
/// assert_eq!(classify("Dreamcast"), PlatformFamily::Other);
/// ```
#[must_use]
pub fn classify(label: &str) -> PlatformFamily {
    let code = label.trim().to_uppercase();
    let code = code.as_str();
    if NINTENDO.contains(&code) {
        PlatformFamily::Nintendo
    } else if PLAYSTATION.contains(&code) {
        PlatformFamily::PlayStation
    } else if XBOX.contains(&code) {
        PlatformFamily::Xbox
    } else if code == "PC" {
        PlatformFamily::Pc
    } else {
        PlatformFamily::Other
    }
}

/// Platform-family selector value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FamilyFilter {
    /// No family filtering.
    #[default]
    All,
    /// Keep only rows of this family.
    Family(PlatformFamily),
}

impl FamilyFilter {
    /// Whether a raw platform label passes this filter.
    #[must_use]
    pub fn accepts(self, platform_label: &str) -> bool {
        match self {
            Self::All => true,
            Self::Family(family) => classify(platform_label) == family,
        }
    }
}

impl fmt::Display for FamilyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Family(family) => family.fmt(f),
        }
    }
}

impl FromStr for FamilyFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        PlatformFamily::from_str_loose(s)
            .map(Self::Family)
            .ok_or_else(|| Error::InvalidFamily(s.to_string()))
    }
}

impl From<PlatformFamily> for FamilyFilter {
    fn from(family: PlatformFamily) -> Self {
        Self::Family(family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_table() {
        for code in NINTENDO {
            assert_eq!(classify(code), PlatformFamily::Nintendo, "{code}");
        }
        for code in PLAYSTATION {
            assert_eq!(classify(code), PlatformFamily::PlayStation, "{code}");
        }
        for code in XBOX {
            assert_eq!(classify(code), PlatformFamily::Xbox, "{code}");
        }
        assert_eq!(classify("PC"), PlatformFamily::Pc);
    }

    #[test]
    fn test_classify_normalizes() {
        assert_eq!(classify("  wiiu\t"), PlatformFamily::Nintendo);
        assert_eq!(classify("pc"), PlatformFamily::Pc);
        assert_eq!(classify("Xone"), PlatformFamily::Xbox);
    }

    #[test]
    fn test_classify_unknown_is_other() {
        assert_eq!(classify(""), PlatformFamily::Other);
        assert_eq!(classify("2600"), PlatformFamily::Other);
        assert_eq!(classify("PS 2"), PlatformFamily::Other);
    }

    #[test]
    fn test_family_filter_parse() {
        assert_eq!("All".parse::<FamilyFilter>().unwrap(), FamilyFilter::All);
        assert_eq!("all".parse::<FamilyFilter>().unwrap(), FamilyFilter::All);
        assert_eq!(
            "PlayStation".parse::<FamilyFilter>().unwrap(),
            FamilyFilter::Family(PlatformFamily::PlayStation)
        );
        assert_eq!(
            "pc".parse::<FamilyFilter>().unwrap(),
            FamilyFilter::Family(PlatformFamily::Pc)
        );
        assert!("Sega".parse::<FamilyFilter>().is_err());
    }

    #[test]
    fn test_family_filter_accepts() {
        assert!(FamilyFilter::All.accepts("anything"));
        assert!(FamilyFilter::Family(PlatformFamily::Other).accepts("GEN"));
        assert!(!FamilyFilter::Family(PlatformFamily::Nintendo).accepts("PS4"));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for family in PlatformFamily::all() {
            let filter = FamilyFilter::Family(*family);
            assert_eq!(filter.to_string().parse::<FamilyFilter>().unwrap(), filter);
        }
    }
}
