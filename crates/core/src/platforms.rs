//! Advertising platforms tracked by subscriptions, ads and advertisers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AdPlatform {
    Facebook,
    Instagram,
    Tiktok,
    Youtube,
    Google,
    Linkedin,
}

impl AdPlatform {
    pub const ALL: [AdPlatform; 6] = [
        AdPlatform::Facebook,
        AdPlatform::Instagram,
        AdPlatform::Tiktok,
        AdPlatform::Youtube,
        AdPlatform::Google,
        AdPlatform::Linkedin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdPlatform::Facebook => "facebook",
            AdPlatform::Instagram => "instagram",
            AdPlatform::Tiktok => "tiktok",
            AdPlatform::Youtube => "youtube",
            AdPlatform::Google => "google",
            AdPlatform::Linkedin => "linkedin",
        }
    }

    /// Human readable label used in generated example content.
    pub fn label(&self) -> &'static str {
        match self {
            AdPlatform::Facebook => "Facebook",
            AdPlatform::Instagram => "Instagram",
            AdPlatform::Tiktok => "TikTok",
            AdPlatform::Youtube => "YouTube",
            AdPlatform::Google => "Google",
            AdPlatform::Linkedin => "LinkedIn",
        }
    }
}

impl fmt::Display for AdPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdPlatform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AdPlatform::ALL
            .into_iter()
            .find(|p| p.as_str() == s.to_ascii_lowercase())
            .ok_or_else(|| Error::invalid_input(format!("Unsupported platform '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Facebook".parse::<AdPlatform>().unwrap(), AdPlatform::Facebook);
        assert_eq!("tiktok".parse::<AdPlatform>().unwrap(), AdPlatform::Tiktok);
        assert!("myspace".parse::<AdPlatform>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&AdPlatform::Linkedin).unwrap();
        assert_eq!(json, "\"linkedin\"");
    }
}
