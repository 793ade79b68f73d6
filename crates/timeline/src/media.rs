use crate::chain::Chain;
use crate::style::{FrameStyle, FrameTemplate};

/// Seconds an uploaded still image occupies on a track.
pub const DEFAULT_IMAGE_DURATION: f64 = 4.0;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize, specta::Type,
)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

impl MediaKind {
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("video/") {
            Self::Video
        } else {
            Self::Image
        }
    }

    pub fn default_extension(self) -> &'static str {
        match self {
            Self::Image => ".jpg",
            Self::Video => ".mp4",
        }
    }

    /// Track duration for a new item: images get the default still duration,
    /// videos play for their own length.
    pub fn track_duration(self, media_duration: Option<f64>) -> f64 {
        match (self, media_duration) {
            (Self::Video, Some(secs)) => secs,
            _ => DEFAULT_IMAGE_DURATION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct Frame {
    pub url: Option<String>,
    #[serde(default)]
    pub kind: MediaKind,
    #[serde(default)]
    pub template: FrameTemplate,
    #[serde(default)]
    pub style: FrameStyle,
}

impl Frame {
    pub fn new(url: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            url: Some(url.into()),
            kind,
            template: FrameTemplate::default(),
            style: FrameStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct Background {
    pub url: Option<String>,
    #[serde(default)]
    pub kind: MediaKind,
}

impl Background {
    pub fn new(url: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            url: Some(url.into()),
            kind,
        }
    }
}

pub type FrameChain = Chain<Frame>;
pub type BackgroundChain = Chain<Background>;
