//! Camera motion configuration and the built-in presets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, ModelResult};

/// Lowest accepted motion intensity.
pub const MIN_INTENSITY: u8 = 1;
/// Highest accepted motion intensity.
pub const MAX_INTENSITY: u8 = 10;

/// Camera movement applied to the still image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CameraMovement {
    #[default]
    Static,
    PanLeft,
    PanRight,
    TiltUp,
    TiltDown,
    ZoomIn,
    ZoomOut,
    DollyIn,
    DollyOut,
    Orbit,
    Crane,
}

impl CameraMovement {
    pub const ALL: &'static [CameraMovement] = &[
        CameraMovement::Static,
        CameraMovement::PanLeft,
        CameraMovement::PanRight,
        CameraMovement::TiltUp,
        CameraMovement::TiltDown,
        CameraMovement::ZoomIn,
        CameraMovement::ZoomOut,
        CameraMovement::DollyIn,
        CameraMovement::DollyOut,
        CameraMovement::Orbit,
        CameraMovement::Crane,
    ];

    /// Wire name, as stored on projects.
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraMovement::Static => "static",
            CameraMovement::PanLeft => "pan-left",
            CameraMovement::PanRight => "pan-right",
            CameraMovement::TiltUp => "tilt-up",
            CameraMovement::TiltDown => "tilt-down",
            CameraMovement::ZoomIn => "zoom-in",
            CameraMovement::ZoomOut => "zoom-out",
            CameraMovement::DollyIn => "dolly-in",
            CameraMovement::DollyOut => "dolly-out",
            CameraMovement::Orbit => "orbit",
            CameraMovement::Crane => "crane",
        }
    }

    /// Phrase used when describing the motion to the video model.
    pub fn phrase(&self) -> &'static str {
        match self {
            CameraMovement::Static => "static shot with no camera movement",
            CameraMovement::PanLeft => "pan to the left",
            CameraMovement::PanRight => "pan to the right",
            CameraMovement::TiltUp => "tilt up",
            CameraMovement::TiltDown => "tilt down",
            CameraMovement::ZoomIn => "zoom in",
            CameraMovement::ZoomOut => "zoom out",
            CameraMovement::DollyIn => "dolly in",
            CameraMovement::DollyOut => "dolly out",
            CameraMovement::Orbit => "orbit around the subject",
            CameraMovement::Crane => "crane shot rising like a drone",
        }
    }
}

impl fmt::Display for CameraMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CameraMovement {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownMovement(s.to_string()))
    }
}

/// How fast the camera moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MovementSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl MovementSpeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementSpeed::Slow => "slow",
            MovementSpeed::Medium => "medium",
            MovementSpeed::Fast => "fast",
        }
    }
}

impl fmt::Display for MovementSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MovementSpeed {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "slow" => Ok(MovementSpeed::Slow),
            "medium" => Ok(MovementSpeed::Medium),
            "fast" => Ok(MovementSpeed::Fast),
            _ => Err(ModelError::UnknownSpeed(s.to_string())),
        }
    }
}

/// Clip length supported by the video model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ClipDuration {
    #[serde(rename = "4s")]
    Four,
    #[default]
    #[serde(rename = "6s")]
    Six,
    #[serde(rename = "8s")]
    Eight,
}

impl ClipDuration {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClipDuration::Four => "4s",
            ClipDuration::Six => "6s",
            ClipDuration::Eight => "8s",
        }
    }

    pub fn seconds(&self) -> u32 {
        match self {
            ClipDuration::Four => 4,
            ClipDuration::Six => 6,
            ClipDuration::Eight => 8,
        }
    }
}

impl fmt::Display for ClipDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClipDuration {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches('s') {
            "4" => Ok(ClipDuration::Four),
            "6" => Ok(ClipDuration::Six),
            "8" => Ok(ClipDuration::Eight),
            _ => Err(ModelError::UnknownDuration(s.to_string())),
        }
    }
}

/// Full camera configuration for one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub movement: CameraMovement,
    pub speed: MovementSpeed,
    pub duration: ClipDuration,
    pub intensity: u8,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            movement: CameraMovement::Static,
            speed: MovementSpeed::Medium,
            duration: ClipDuration::Six,
            intensity: 5,
        }
    }
}

impl CameraConfig {
    /// Check the intensity bounds.
    pub fn validate(&self) -> ModelResult<()> {
        if !(MIN_INTENSITY..=MAX_INTENSITY).contains(&self.intensity) {
            return Err(ModelError::IntensityOutOfRange {
                value: self.intensity,
                min: MIN_INTENSITY,
                max: MAX_INTENSITY,
            });
        }
        Ok(())
    }

    /// Directive sentence appended to the user's prompt.
    pub fn directive(&self) -> String {
        format!(
            "Camera: {} {}, {}, intensity {}/{}.",
            self.speed.as_str(),
            self.movement.phrase(),
            self.duration.as_str(),
            self.intensity,
            MAX_INTENSITY
        )
    }
}

/// A named one-click camera configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CameraPreset {
    pub name: &'static str,
    pub movement: CameraMovement,
    pub speed: MovementSpeed,
    pub duration: ClipDuration,
    pub intensity: u8,
    pub description: &'static str,
}

/// Built-in presets, in display order.
pub const CAMERA_PRESETS: &[CameraPreset] = &[
    CameraPreset {
        name: "Cinematic Zoom",
        movement: CameraMovement::ZoomIn,
        speed: MovementSpeed::Slow,
        duration: ClipDuration::Six,
        intensity: 7,
        description: "Slow, cinematic zoom in",
    },
    CameraPreset {
        name: "Orbital View",
        movement: CameraMovement::Orbit,
        speed: MovementSpeed::Medium,
        duration: ClipDuration::Six,
        intensity: 6,
        description: "Smooth orbit around the subject",
    },
    CameraPreset {
        name: "Dynamic Pan",
        movement: CameraMovement::PanRight,
        speed: MovementSpeed::Medium,
        duration: ClipDuration::Four,
        intensity: 5,
        description: "Dynamic pan to the right",
    },
    CameraPreset {
        name: "Drone Rise",
        movement: CameraMovement::Crane,
        speed: MovementSpeed::Slow,
        duration: ClipDuration::Eight,
        intensity: 8,
        description: "Drone-style crane movement",
    },
    CameraPreset {
        name: "Static Frame",
        movement: CameraMovement::Static,
        speed: MovementSpeed::Slow,
        duration: ClipDuration::Six,
        intensity: 1,
        description: "No movement, locked-off frame",
    },
];

impl CameraPreset {
    /// Kebab-case identifier, e.g. `drone-rise`.
    pub fn slug(&self) -> String {
        self.name.to_lowercase().replace(' ', "-")
    }

    pub fn config(&self) -> CameraConfig {
        CameraConfig {
            movement: self.movement,
            speed: self.speed,
            duration: self.duration,
            intensity: self.intensity,
        }
    }

    /// Find a preset by display name or slug, ignoring case.
    pub fn find(name: &str) -> ModelResult<&'static CameraPreset> {
        let wanted = name.trim().to_lowercase();
        CAMERA_PRESETS
            .iter()
            .find(|p| p.name.to_lowercase() == wanted || p.slug() == wanted)
            .ok_or_else(|| ModelError::UnknownPreset(name.to_string()))
    }
}
