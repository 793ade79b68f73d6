//! Closed style records for text overlays and frames.
//!
//! Every field has a default, and unknown keys are rejected when a style is
//! read from JSON.

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize, specta::Type,
)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: String,
    pub color: String,
    pub font_size: String,
    pub font_weight: u16,
    pub opacity: f64,
    pub transform: String,
    pub left: String,
    pub top: String,
    pub line_height: String,
    pub width: String,
    pub height: String,
    /// Caption groups shown together as stacked lines.
    pub stack: u32,
    pub place: Placement,
}

impl TextStyle {
    /// Stack height, never less than one line.
    pub fn stack_lines(&self) -> usize {
        self.stack.max(1) as usize
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".into(),
            color: "#000000".into(),
            font_size: "4rem".into(),
            font_weight: 400,
            opacity: 1.0,
            transform: "rotate(0deg)".into(),
            left: "0%".into(),
            top: "0%".into(),
            line_height: "1.2".into(),
            width: "100%".into(),
            height: "auto".into(),
            stack: 1,
            place: Placement::Center,
        }
    }
}

/// How a frame's media is laid out in the composition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize, specta::Type,
)]
#[serde(rename_all = "snake_case")]
pub enum FrameTemplate {
    #[default]
    Fullscreen,
    Boxed,
    Boxed2,
    Boxed3,
    BoxedN,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct FrameStyle {
    pub width: String,
    pub height: String,
    pub object_position: String,
    pub object_fit: String,
    pub justify_content: String,
    pub align_items: String,
    pub padding: String,
    pub border_radius: String,
    pub box_shadow: String,
    pub border_style: String,
    pub border_width: String,
    pub border_color: String,
    pub overflow: String,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            width: "100%".into(),
            height: "100%".into(),
            object_position: "center".into(),
            object_fit: "cover".into(),
            justify_content: "center".into(),
            align_items: "center".into(),
            padding: "0rem".into(),
            border_radius: "0rem".into(),
            box_shadow: "30px 30px 12px rgba(0, 0, 0, 0.4)".into(),
            border_style: "solid".into(),
            border_width: "0rem".into(),
            border_color: "transparent".into(),
            overflow: "hidden".into(),
        }
    }
}
