mod error;

pub mod bgm;
pub mod chain;
pub mod collaborator;
pub mod controller;
pub mod estimate;
pub mod grouping;
pub mod highlight;
pub mod id;
pub mod input;
pub mod media;
pub mod repair;
pub mod schedule;
pub mod segment;
pub mod session;
pub mod srt;
pub mod style;
pub mod transition;
pub mod types;

pub use error::*;

pub use bgm::{BgmPoint, BgmTrack, PointEdit, RangeEdit, TextPoints, TextRange};
pub use chain::{Chain, EditPropagation, FieldEdit, TimedItem};
pub use collaborator::{
    AssetKind, AssetStorage, BoxFuture, CollaboratorError, SavedSession, SessionStore,
    Transcriber, Upload,
};
pub use controller::Editor;
pub use estimate::ScriptEstimate;
pub use grouping::{GroupSizePolicy, group};
pub use highlight::{HighlightIndex, Toggle, WordHighlightEntry};
pub use id::{IdGenerator, SequentialIdGen, UuidIdGen};
pub use input::{TranscriptInput, TranscriptionResponse, TranscriptionWord};
pub use media::{Background, BackgroundChain, Frame, FrameChain, MediaKind};
pub use repair::{RepairConfig, repair, repair_with};
pub use schedule::{
    Layer, MediaSource, RenderConfig, RenderInstruction, Schedule, ScheduleItem, StyledWord,
    VolumeEnvelope, resolve,
};
pub use segment::{SecondaryTextSegment, Segment, SegmentTiming, Segments, TextSegment};
pub use session::{Narration, ScriptInfo, Session};
pub use srt::to_srt;
pub use style::{FrameStyle, FrameTemplate, Placement, TextStyle};
pub use transition::{BoundarySelection, TransitionAsset, Transitions};
pub use types::{CaptionGroup, Word, WordEdit};
