use crate::chain::{FieldEdit, edit_timing};
use crate::error::{Error, Result, check_duration, check_start};
use crate::id::IdGenerator;
use crate::style::TextStyle;

pub const DEFAULT_SEGMENT_DURATION: f64 = 2.0;

/// Free-standing `start + duration = end` placement. Segments may overlap.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct SegmentTiming {
    pub start: f64,
    pub duration: f64,
    pub end: f64,
}

impl SegmentTiming {
    pub fn new(start: f64, duration: f64) -> Result<Self> {
        check_start(start)?;
        check_duration(duration)?;
        Ok(Self {
            start,
            duration,
            end: start + duration,
        })
    }

    pub fn apply(&mut self, edit: FieldEdit) -> Result<()> {
        let (start, duration, end) = edit_timing(self.start, self.duration, edit)?;
        *self = Self {
            start,
            duration,
            end,
        };
        Ok(())
    }
}

/// A caption overlay: the transcript words that fall inside the segment are
/// drawn with `style`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct TextSegment {
    pub id: String,
    #[serde(flatten)]
    pub timing: SegmentTiming,
    #[serde(default)]
    pub style: TextStyle,
}

/// A free-text overlay that ignores the transcript.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct SecondaryTextSegment {
    pub id: String,
    #[serde(flatten)]
    pub timing: SegmentTiming,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub style: TextStyle,
}

pub trait Segment {
    fn create(id: String, timing: SegmentTiming) -> Self;
    fn id(&self) -> &str;
    fn timing(&self) -> &SegmentTiming;
    fn timing_mut(&mut self) -> &mut SegmentTiming;
    fn style_mut(&mut self) -> &mut TextStyle;
}

impl Segment for TextSegment {
    fn create(id: String, timing: SegmentTiming) -> Self {
        Self {
            id,
            timing,
            style: TextStyle::default(),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn timing(&self) -> &SegmentTiming {
        &self.timing
    }

    fn timing_mut(&mut self) -> &mut SegmentTiming {
        &mut self.timing
    }

    fn style_mut(&mut self) -> &mut TextStyle {
        &mut self.style
    }
}

impl Segment for SecondaryTextSegment {
    fn create(id: String, timing: SegmentTiming) -> Self {
        Self {
            id,
            timing,
            text: String::new(),
            style: TextStyle::default(),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn timing(&self) -> &SegmentTiming {
        &self.timing
    }

    fn timing_mut(&mut self) -> &mut SegmentTiming {
        &mut self.timing
    }

    fn style_mut(&mut self) -> &mut TextStyle {
        &mut self.style
    }
}

/// An insertion-ordered set of independently anchored segments.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(transparent)]
pub struct Segments<S> {
    items: Vec<S>,
}

impl<S: Segment> Segments<S> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&S> {
        self.items.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut S> {
        self.items
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| Error::UnknownSegment(id.to_string()))
    }

    /// Add a default-length segment right after the most recently added one.
    pub fn add(&mut self, ids: &mut dyn IdGenerator) -> &S {
        let start = self.items.last().map_or(0.0, |s| s.timing().end);
        let timing = SegmentTiming {
            start,
            duration: DEFAULT_SEGMENT_DURATION,
            end: start + DEFAULT_SEGMENT_DURATION,
        };
        self.items.push(S::create(ids.next_id(), timing));
        &self.items[self.items.len() - 1]
    }

    pub fn edit_timing(&mut self, id: &str, edit: FieldEdit) -> Result<()> {
        self.get_mut(id)?.timing_mut().apply(edit)
    }

    pub fn set_style(&mut self, id: &str, style: TextStyle) -> Result<()> {
        *self.get_mut(id)?.style_mut() = style;
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<S> {
        let pos = self
            .items
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| Error::UnknownSegment(id.to_string()))?;
        Ok(self.items.remove(pos))
    }
}

impl<S: Segment> Default for Segments<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, S> IntoIterator for &'a Segments<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
