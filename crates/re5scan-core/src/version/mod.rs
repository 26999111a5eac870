//! Build identification by executable content digest.

mod hashes;

pub use hashes::*;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Shipped binary revision of the game executable.
///
/// Determined once per attached process and never changed afterwards.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
)]
pub enum GameVersion {
    #[default]
    #[strum(serialize = "unknown")]
    #[serde(rename = "unknown")]
    Unknown,
    /// Steam worldwide release, 2020-09-22 build
    #[strum(serialize = "steam_1_1_0")]
    #[serde(rename = "steam_1_1_0")]
    Steam110,
    /// Steam worldwide release, 2023-08-07 build
    #[strum(serialize = "steam_1_2_0")]
    #[serde(rename = "steam_1_2_0")]
    Steam120,
}

impl GameVersion {
    /// Unknown builds are never scanned
    pub fn is_known(&self) -> bool {
        *self != Self::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_version_names() {
        assert_eq!(GameVersion::Steam110.to_string(), "steam_1_1_0");
        assert_eq!(
            GameVersion::from_str("steam_1_2_0").unwrap(),
            GameVersion::Steam120
        );
        assert_eq!(GameVersion::default(), GameVersion::Unknown);
    }

    #[test]
    fn test_is_known() {
        assert!(!GameVersion::Unknown.is_known());
        assert!(GameVersion::Steam110.is_known());
        assert!(GameVersion::Steam120.is_known());
    }
}
