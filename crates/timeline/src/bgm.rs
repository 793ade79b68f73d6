//! Background music tracks.
//!
//! Points are placed on the global timeline independently of each other and
//! each plays a trimmed window `[start_from, end_at]` of the source file.
//! Text-point ranges are a second, additive trigger: every transcript word
//! inside an enabled range replays the track from its beginning.

use crate::chain::{FieldEdit, edit_timing};
use crate::error::{Error, Result, check_duration, check_index, check_start, check_volume};

pub const DEFAULT_BGM_VOLUME: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(rename_all = "camelCase")]
pub struct BgmPoint {
    pub id: u32,
    pub start: f64,
    pub duration: f64,
    pub end: f64,
    pub start_from: f64,
    pub end_at: f64,
}

impl BgmPoint {
    fn full_length(id: u32, duration: f64) -> Self {
        Self {
            id,
            start: 0.0,
            duration,
            end: duration,
            start_from: 0.0,
            end_at: duration,
        }
    }

    fn retime(&mut self, edit: FieldEdit) -> Result<()> {
        let (start, duration, end) = edit_timing(self.start, self.duration, edit)?;
        self.start = start;
        self.duration = duration;
        self.end = end;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum PointEdit {
    Start(f64),
    Duration(f64),
    End(f64),
    StartFrom(f64),
    EndAt(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(rename_all = "camelCase")]
pub struct TextRange {
    pub start_text_point: f64,
    pub end_text_point: f64,
}

impl TextRange {
    pub fn contains(&self, start: f64, end: f64) -> bool {
        start >= self.start_text_point && end <= self.end_text_point
    }
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum RangeEdit {
    Start(f64),
    End(f64),
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct TextPoints {
    pub toggle: bool,
    pub ranges: Vec<TextRange>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(rename_all = "camelCase")]
pub struct BgmTrack {
    pub id: String,
    pub url: String,
    pub name: String,
    pub duration: f64,
    pub volume: f64,
    pub points: Vec<BgmPoint>,
    pub text_points: TextPoints,
}

impl BgmTrack {
    /// A new track plays once, in full, from the start of the video.
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        name: impl Into<String>,
        duration: f64,
    ) -> Result<Self> {
        check_duration(duration)?;
        Ok(Self {
            id: id.into(),
            url: url.into(),
            name: name.into(),
            duration,
            volume: DEFAULT_BGM_VOLUME,
            points: vec![BgmPoint::full_length(1, duration)],
            text_points: TextPoints {
                toggle: false,
                ranges: vec![Self::full_range(duration)],
            },
        })
    }

    fn full_range(duration: f64) -> TextRange {
        TextRange {
            start_text_point: 0.0,
            end_text_point: duration,
        }
    }

    pub fn set_volume(&mut self, volume: f64) -> Result<()> {
        check_volume(volume)?;
        self.volume = volume;
        Ok(())
    }

    pub fn point(&self, id: u32) -> Option<&BgmPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Adds a full-length point and returns its id.
    pub fn add_point(&mut self) -> u32 {
        let id = self.points.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        self.points.push(BgmPoint::full_length(id, self.duration));
        id
    }

    pub fn edit_point(&mut self, id: u32, edit: PointEdit) -> Result<()> {
        let duration = self.duration;
        let point = self
            .points
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(Error::UnknownBgmPoint(id))?;

        match edit {
            PointEdit::Start(v) => point.retime(FieldEdit::Start(v))?,
            PointEdit::Duration(v) => point.retime(FieldEdit::Duration(v))?,
            PointEdit::End(v) => point.retime(FieldEdit::End(v))?,
            PointEdit::StartFrom(v) => {
                check_trim(v, point.end_at, duration)?;
                point.start_from = v;
            }
            PointEdit::EndAt(v) => {
                check_trim(point.start_from, v, duration)?;
                point.end_at = v;
            }
        }
        Ok(())
    }

    pub fn remove_point(&mut self, id: u32) -> Result<BgmPoint> {
        let pos = self
            .points
            .iter()
            .position(|p| p.id == id)
            .ok_or(Error::UnknownBgmPoint(id))?;
        Ok(self.points.remove(pos))
    }

    /// Enabling text points starts over from a single full-length range.
    pub fn set_text_points_enabled(&mut self, enabled: bool) {
        if enabled {
            self.text_points.ranges = vec![Self::full_range(self.duration)];
        }
        self.text_points.toggle = enabled;
    }

    /// Append a range that starts where the last one ends and lasts at most
    /// one track length, capped at the track duration.
    pub fn add_text_range(&mut self) -> Result<usize> {
        let start = self
            .text_points
            .ranges
            .last()
            .map_or(0.0, |r| r.end_text_point);
        let end = f64::min(start + self.duration, self.duration);
        if end <= start {
            return Err(Error::EndNotAfterStart { start, end });
        }
        self.text_points.ranges.push(TextRange {
            start_text_point: start,
            end_text_point: end,
        });
        Ok(self.text_points.ranges.len() - 1)
    }

    pub fn edit_text_range(&mut self, index: usize, edit: RangeEdit) -> Result<()> {
        check_index(index, self.text_points.ranges.len())?;
        let range = &mut self.text_points.ranges[index];
        let (start, end) = match edit {
            RangeEdit::Start(start) => {
                check_start(start)?;
                (start, range.end_text_point)
            }
            RangeEdit::End(end) => (range.start_text_point, end),
        };
        if !end.is_finite() || end <= start {
            return Err(Error::EndNotAfterStart { start, end });
        }
        range.start_text_point = start;
        range.end_text_point = end;
        Ok(())
    }

    pub fn remove_text_range(&mut self, index: usize) -> Result<TextRange> {
        check_index(index, self.text_points.ranges.len())?;
        Ok(self.text_points.ranges.remove(index))
    }
}

fn check_trim(start_from: f64, end_at: f64, duration: f64) -> Result<()> {
    if 0.0 <= start_from && start_from <= end_at && end_at <= duration {
        Ok(())
    } else {
        Err(Error::InvalidTrimWindow {
            start_from,
            end_at,
            duration,
        })
    }
}
