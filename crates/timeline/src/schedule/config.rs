pub const DEFAULT_FPS: u32 = 30;
pub const DEFAULT_WIDTH: u32 = 1080;
pub const DEFAULT_HEIGHT: u32 = 1920;
pub const DEFAULT_FADE_OUT_SECS: f64 = 3.0;
pub const DEFAULT_PLACEHOLDER_COLOR: &str = "#000000";
pub const DEFAULT_DURATION_IN_FRAMES: i64 = 100;

/// Composition settings handed to the render consumer.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct RenderConfig {
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    /// Music fades to silence over this many seconds before the narration ends.
    pub fade_out_secs: f64,
    /// Fill for time ranges whose asset URL is missing.
    pub placeholder_color: String,
    /// Composition length when the narration duration is unknown.
    pub default_duration_in_frames: i64,
}

impl RenderConfig {
    pub fn new() -> Self {
        Self {
            fps: DEFAULT_FPS,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fade_out_secs: DEFAULT_FADE_OUT_SECS,
            placeholder_color: DEFAULT_PLACEHOLDER_COLOR.to_string(),
            default_duration_in_frames: DEFAULT_DURATION_IN_FRAMES,
        }
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps.max(1);
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_fade_out_secs(mut self, secs: f64) -> Self {
        self.fade_out_secs = secs;
        self
    }

    pub fn with_placeholder_color(mut self, color: impl Into<String>) -> Self {
        self.placeholder_color = color.into();
        self
    }

    /// Frame index that contains `secs`.
    pub fn frame_floor(&self, secs: f64) -> i64 {
        snap(secs * self.fps as f64).floor() as i64
    }

    /// Frames needed to cover `secs`.
    pub fn frames_ceil(&self, secs: f64) -> i64 {
        snap(secs * self.fps as f64).ceil() as i64
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}

// 0.1 * 30 is 3.0000000000000004; without snapping that ceil()s to 4 frames.
fn snap(frames: f64) -> f64 {
    let rounded = frames.round();
    if (frames - rounded).abs() < 1e-6 {
        rounded
    } else {
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_conversion() {
        let config = RenderConfig::default();
        assert_eq!(config.frame_floor(1.99), 59);
        assert_eq!(config.frames_ceil(1.01), 31);
        assert_eq!(config.frames_ceil(0.1), 3);
        assert_eq!(config.frame_floor(0.7), 21);
    }

    #[test]
    fn fps_is_at_least_one() {
        assert_eq!(RenderConfig::new().with_fps(0).fps, 1);
    }
}
