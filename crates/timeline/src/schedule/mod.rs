//! Compiles a session into a flat, frame-indexed render schedule.
//!
//! Every item carries an absolute `start_frame` and `duration_frames` at the
//! configured frame rate, with `start_frame = floor(secs * fps)` and
//! `duration_frames = ceil(secs * fps)`. Items are ordered by [`Layer`] and
//! then by start frame, which is also the paint order for the renderer.

mod audio;
mod captions;
mod config;
mod visual;

pub use config::*;

use crate::session::Session;
use crate::style::{FrameStyle, FrameTemplate, TextStyle};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    specta::Type,
)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Background,
    Frame,
    Transition,
    Caption,
    Overlay,
    Audio,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MediaSource {
    Image { url: String },
    Video { url: String, looped: bool, muted: bool },
    Solid { color: String },
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct StyledWord {
    pub text: String,
    pub color: String,
}

/// Linear fade from `base` at `fade_start_frame` to silence at
/// `fade_end_frame`. Frames are absolute composition frames.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct VolumeEnvelope {
    pub base: f64,
    pub fade_start_frame: i64,
    pub fade_end_frame: i64,
}

impl VolumeEnvelope {
    pub fn at(&self, frame: i64) -> f64 {
        if frame >= self.fade_end_frame {
            0.0
        } else if frame <= self.fade_start_frame {
            self.base
        } else {
            let remaining = (self.fade_end_frame - frame) as f64;
            let span = (self.fade_end_frame - self.fade_start_frame) as f64;
            self.base * remaining / span
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum CueTrigger {
    Point { id: u32 },
    Word { word: String, range: usize },
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderInstruction {
    Background {
        index: usize,
        media: MediaSource,
    },
    Frame {
        index: usize,
        template: FrameTemplate,
        style: FrameStyle,
        media: MediaSource,
    },
    Transition {
        boundary: usize,
        asset: usize,
        media: MediaSource,
        volume: f64,
        fade_frames: i64,
    },
    /// One reveal step of a caption stack: `lines[i]` is what line `i` shows.
    Caption {
        segment_id: String,
        lines: Vec<Vec<StyledWord>>,
        style: TextStyle,
    },
    Text {
        segment_id: String,
        text: String,
        style: TextStyle,
    },
    Narration {
        url: String,
    },
    Music {
        track_id: String,
        url: String,
        trigger: CueTrigger,
        start_from_frame: i64,
        end_at_frame: i64,
        volume: VolumeEnvelope,
    },
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct ScheduleItem {
    pub layer: Layer,
    pub start_frame: i64,
    pub duration_frames: i64,
    pub instruction: RenderInstruction,
}

impl ScheduleItem {
    pub fn end_frame(&self) -> i64 {
        self.start_frame + self.duration_frames
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct Schedule {
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    pub duration_in_frames: i64,
    pub background_color: String,
    pub items: Vec<ScheduleItem>,
}

impl Schedule {
    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &ScheduleItem> {
        self.items.iter().filter(move |item| item.layer == layer)
    }
}

/// Accumulates items for one resolve pass.
pub(crate) struct Emitter<'a> {
    config: &'a RenderConfig,
    items: Vec<ScheduleItem>,
}

impl<'a> Emitter<'a> {
    fn new(config: &'a RenderConfig) -> Self {
        Self {
            config,
            items: Vec::new(),
        }
    }

    /// Emit an item covering `[start, start + duration)` seconds.
    fn push_secs(&mut self, layer: Layer, start: f64, duration: f64, instruction: RenderInstruction) {
        let start_frame = self.config.frame_floor(start);
        let duration_frames = self.config.frames_ceil(duration);
        self.push_frames(layer, start_frame, duration_frames, instruction);
    }

    fn push_frames(
        &mut self,
        layer: Layer,
        start_frame: i64,
        duration_frames: i64,
        instruction: RenderInstruction,
    ) {
        if duration_frames <= 0 {
            return;
        }
        self.items.push(ScheduleItem {
            layer,
            start_frame,
            duration_frames,
            instruction,
        });
    }

    fn placeholder(&self) -> MediaSource {
        MediaSource::Solid {
            color: self.config.placeholder_color.clone(),
        }
    }
}

/// Resolve every track of `session` into one schedule.
pub fn resolve(session: &Session, config: &RenderConfig) -> Schedule {
    let narration_frames = session
        .narration()
        .duration
        .map(|secs| config.frames_ceil(secs));
    let duration_in_frames = narration_frames.unwrap_or(config.default_duration_in_frames);

    let mut out = Emitter::new(config);

    visual::backgrounds(session.backgrounds(), &mut out);
    visual::frames(session.frames(), &mut out);
    visual::transitions(session.frames(), session.transitions(), &mut out);
    for segment in session.text_segments() {
        captions::segment(
            segment,
            session.groups(),
            session.words(),
            session.highlights(),
            &mut out,
        );
    }
    visual::secondary_text(session.secondary_segments(), &mut out);

    if let Some(url) = &session.narration().url {
        out.push_frames(
            Layer::Audio,
            0,
            duration_in_frames,
            RenderInstruction::Narration { url: url.clone() },
        );
    }
    match narration_frames {
        Some(frames) => audio::music(session.bgm(), session.words(), frames, &mut out),
        None if !session.bgm().is_empty() => {
            tracing::debug!(tracks = session.bgm().len(), "bgm_skipped_without_narration");
        }
        None => {}
    }

    let mut items = out.items;
    items.sort_by_key(|item| (item.layer, item.start_frame));

    Schedule {
        fps: config.fps,
        width: config.width,
        height: config.height,
        duration_in_frames,
        background_color: session.background_color.clone(),
        items,
    }
}
