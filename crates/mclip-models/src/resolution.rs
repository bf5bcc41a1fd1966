//! Output resolution for generated clips.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Resolution requested from the video model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VideoResolution {
    #[default]
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
}

impl VideoResolution {
    pub const ALL: &'static [VideoResolution] = &[VideoResolution::P720, VideoResolution::P1080];

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoResolution::P720 => "720p",
            VideoResolution::P1080 => "1080p",
        }
    }
}

impl fmt::Display for VideoResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VideoResolution {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "720p" | "720" => Ok(VideoResolution::P720),
            "1080p" | "1080" => Ok(VideoResolution::P1080),
            _ => Err(ModelError::UnknownResolution(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_720p() {
        assert_eq!(VideoResolution::default(), VideoResolution::P720);
    }

    #[test]
    fn test_parse_accepts_bare_numbers() {
        assert_eq!("1080".parse::<VideoResolution>().unwrap(), VideoResolution::P1080);
        assert_eq!(" 720P ".parse::<VideoResolution>().unwrap(), VideoResolution::P720);
        assert!("4k".parse::<VideoResolution>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&VideoResolution::P1080).unwrap();
        assert_eq!(json, "\"1080p\"");
    }
}
