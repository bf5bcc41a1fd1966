//! Prompt composition.

use crate::camera::CameraConfig;

/// Used when the user leaves the prompt blank.
pub const DEFAULT_ANIMATION_PROMPT: &str = "Animate this scene with a person moving naturally.";

/// Build the final prompt sent to the video model.
///
/// The user's text is trimmed. A blank prompt falls back to
/// [`DEFAULT_ANIMATION_PROMPT`]. When a camera configuration is supplied its
/// directive sentence is appended.
pub fn compose_prompt(prompt: &str, camera: Option<&CameraConfig>) -> String {
    let base = match prompt.trim() {
        "" => DEFAULT_ANIMATION_PROMPT,
        trimmed => trimmed,
    };

    match camera {
        Some(camera) => {
            let separator = if base.ends_with(['.', '!', '?']) { " " } else { ". " };
            format!("{base}{separator}{}", camera.directive())
        }
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraPreset;

    #[test]
    fn test_blank_prompt_uses_default() {
        assert_eq!(compose_prompt("   ", None), DEFAULT_ANIMATION_PROMPT);
    }

    #[test]
    fn test_prompt_is_trimmed() {
        assert_eq!(compose_prompt("  a cat waves \n", None), "a cat waves");
    }

    #[test]
    fn test_camera_directive_appended() {
        let camera = CameraPreset::find("Cinematic Zoom").unwrap().config();
        assert_eq!(
            compose_prompt("a cat waves", Some(&camera)),
            "a cat waves. Camera: slow zoom in, 6s, intensity 7/10."
        );
        assert_eq!(
            compose_prompt("", Some(&camera)),
            "Animate this scene with a person moving naturally. Camera: slow zoom in, 6s, intensity 7/10."
        );
    }
}
