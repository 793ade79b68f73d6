//! The editor session: every track of one project, owned in one place.
//!
//! Mutations go through methods that validate first and only then write, so
//! a rejected edit leaves the session untouched. Caption groups are derived
//! state; every method that changes words or group sizes ends with an
//! explicit [`Session::regroup`].

use crate::bgm::BgmTrack;
use crate::chain::{EditPropagation, FieldEdit};
use crate::error::{Error, Result, check_duration, check_index, check_start};
use crate::estimate::ScriptEstimate;
use crate::grouping::{GroupSizePolicy, group};
use crate::highlight::{HighlightIndex, Toggle};
use crate::id::IdGenerator;
use crate::input::TranscriptInput;
use crate::media::{BackgroundChain, FrameChain};
use crate::schedule::{RenderConfig, Schedule, resolve};
use crate::segment::{SecondaryTextSegment, Segments, TextSegment};
use crate::srt::to_srt;
use crate::transition::Transitions;
use crate::types::{CaptionGroup, Word, WordEdit, sort_by_start};

pub const DEFAULT_BACKGROUND_COLOR: &str = "#000000";

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct Narration {
    pub url: Option<String>,
    pub duration: Option<f64>,
}

/// Inputs and output of the script generation step.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(default)]
pub struct ScriptInfo {
    pub prompt: String,
    pub topic: String,
    pub script: String,
    pub model: String,
    pub voice: String,
}

impl ScriptInfo {
    pub fn estimate(&self) -> ScriptEstimate {
        ScriptEstimate::from_script(&self.script)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(default, rename_all = "camelCase")]
pub struct Session {
    pub name: String,
    pub script: ScriptInfo,
    pub background_color: String,
    pub edit_propagation: EditPropagation,
    narration: Narration,
    words: Vec<Word>,
    group_sizes: GroupSizePolicy,
    groups: Vec<CaptionGroup>,
    highlights: HighlightIndex,
    frames: FrameChain,
    backgrounds: BackgroundChain,
    text_segments: Segments<TextSegment>,
    secondary_segments: Segments<SecondaryTextSegment>,
    transitions: Transitions,
    bgm: Vec<BgmTrack>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            script: ScriptInfo::default(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            edit_propagation: EditPropagation::default(),
            narration: Narration::default(),
            words: Vec::new(),
            group_sizes: GroupSizePolicy::default(),
            groups: Vec::new(),
            highlights: HighlightIndex::new(),
            frames: FrameChain::new(),
            backgrounds: BackgroundChain::new(),
            text_segments: Segments::new(),
            secondary_segments: Segments::new(),
            transitions: Transitions::new(),
            bgm: Vec::new(),
        }
    }

    /// Read a saved session blob. Derived caption groups are rebuilt rather
    /// than trusted.
    pub fn from_value(blob: serde_json::Value) -> Result<Self> {
        let mut session: Self = serde_json::from_value(blob)?;
        session.regroup();
        Ok(session)
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    // ── Narration and captions ──────────────────────────────────────────────

    pub fn narration(&self) -> &Narration {
        &self.narration
    }

    pub fn set_narration(&mut self, url: Option<String>, duration: Option<f64>) -> Result<()> {
        if let Some(secs) = duration {
            check_duration(secs)?;
        }
        self.narration = Narration { url, duration };
        Ok(())
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn groups(&self) -> &[CaptionGroup] {
        &self.groups
    }

    pub fn group_sizes(&self) -> &GroupSizePolicy {
        &self.group_sizes
    }

    /// Replace the caption words with a fresh transcription.
    pub fn apply_transcript(&mut self, input: TranscriptInput) -> Result<()> {
        if let Some(secs) = input.duration {
            check_duration(secs)?;
            self.narration.duration = Some(secs);
        }
        self.words = input.words;
        self.regroup();
        Ok(())
    }

    pub fn edit_word(&mut self, index: usize, edit: WordEdit) -> Result<()> {
        check_index(index, self.words.len())?;
        let word = &self.words[index];

        let updated = match edit {
            WordEdit::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(Error::EmptyWord);
                }
                Word::new(text, word.start, word.end)
            }
            WordEdit::Start(start) => {
                check_start(start)?;
                if word.end <= start {
                    return Err(Error::EndNotAfterStart {
                        start,
                        end: word.end,
                    });
                }
                Word::new(word.word.clone(), start, word.end)
            }
            WordEdit::End(end) => {
                if !end.is_finite() || end <= word.start {
                    return Err(Error::EndNotAfterStart {
                        start: word.start,
                        end,
                    });
                }
                Word::new(word.word.clone(), word.start, end)
            }
        };

        self.words[index] = updated;
        sort_by_start(&mut self.words);
        self.regroup();
        Ok(())
    }

    pub fn delete_word(&mut self, index: usize) -> Result<Word> {
        check_index(index, self.words.len())?;
        let removed = self.words.remove(index);
        self.regroup();
        Ok(removed)
    }

    /// Insert a word in start order. Whitespace inside the text is dropped.
    pub fn add_word(&mut self, word: Word) -> Result<usize> {
        let text: String = word.word.split_whitespace().collect();
        if text.is_empty() {
            return Err(Error::EmptyWord);
        }
        check_start(word.start)?;
        if !word.end.is_finite() || word.end <= word.start {
            return Err(Error::EndNotAfterStart {
                start: word.start,
                end: word.end,
            });
        }

        let index = self.words.partition_point(|w| w.start <= word.start);
        self.words.insert(index, Word::new(text, word.start, word.end));
        self.regroup();
        Ok(index)
    }

    pub fn set_group_size(&mut self, index: usize, size: usize) -> Result<()> {
        self.group_sizes.set(index, size)?;
        self.regroup();
        Ok(())
    }

    pub fn set_group_sizes(&mut self, policy: GroupSizePolicy) {
        self.group_sizes = policy;
        self.regroup();
    }

    /// Recompute caption groups from the words and the size policy.
    pub fn regroup(&mut self) {
        self.groups = group(&self.words, &self.group_sizes);
    }

    pub fn highlights(&self) -> &HighlightIndex {
        &self.highlights
    }

    pub fn highlights_mut(&mut self) -> &mut HighlightIndex {
        &mut self.highlights
    }

    pub fn toggle_highlight(
        &mut self,
        word: &str,
        color: &str,
        caption_start: f64,
        caption_end: f64,
    ) -> Toggle {
        self.highlights
            .toggle(word, color, caption_start, caption_end)
    }

    // ── Frames and backgrounds ──────────────────────────────────────────────

    pub fn frames(&self) -> &FrameChain {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut FrameChain {
        &mut self.frames
    }

    pub fn edit_frame(&mut self, index: usize, edit: FieldEdit) -> Result<()> {
        self.frames.edit(index, edit, self.edit_propagation)
    }

    pub fn backgrounds(&self) -> &BackgroundChain {
        &self.backgrounds
    }

    pub fn backgrounds_mut(&mut self) -> &mut BackgroundChain {
        &mut self.backgrounds
    }

    pub fn edit_background(&mut self, index: usize, edit: FieldEdit) -> Result<()> {
        self.backgrounds.edit(index, edit, self.edit_propagation)
    }

    pub fn transitions(&self) -> &Transitions {
        &self.transitions
    }

    pub fn transitions_mut(&mut self) -> &mut Transitions {
        &mut self.transitions
    }

    // ── Text overlays ───────────────────────────────────────────────────────

    pub fn text_segments(&self) -> &Segments<TextSegment> {
        &self.text_segments
    }

    pub fn text_segments_mut(&mut self) -> &mut Segments<TextSegment> {
        &mut self.text_segments
    }

    pub fn secondary_segments(&self) -> &Segments<SecondaryTextSegment> {
        &self.secondary_segments
    }

    pub fn secondary_segments_mut(&mut self) -> &mut Segments<SecondaryTextSegment> {
        &mut self.secondary_segments
    }

    pub fn set_secondary_text(&mut self, id: &str, text: impl Into<String>) -> Result<()> {
        self.secondary_segments.get_mut(id)?.text = text.into();
        Ok(())
    }

    // ── Music ───────────────────────────────────────────────────────────────

    pub fn bgm(&self) -> &[BgmTrack] {
        &self.bgm
    }

    pub fn bgm_track_mut(&mut self, id: &str) -> Result<&mut BgmTrack> {
        self.bgm
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::UnknownBgmTrack(id.to_string()))
    }

    pub fn add_bgm_track(
        &mut self,
        ids: &mut dyn IdGenerator,
        url: impl Into<String>,
        name: impl Into<String>,
        duration: f64,
    ) -> Result<&BgmTrack> {
        let track = BgmTrack::new(ids.next_id(), url, name, duration)?;
        self.bgm.push(track);
        Ok(&self.bgm[self.bgm.len() - 1])
    }

    pub fn remove_bgm_track(&mut self, id: &str) -> Result<BgmTrack> {
        let pos = self
            .bgm
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::UnknownBgmTrack(id.to_string()))?;
        Ok(self.bgm.remove(pos))
    }

    // ── Output ──────────────────────────────────────────────────────────────

    pub fn resolve(&self, config: &RenderConfig) -> Schedule {
        resolve(self, config)
    }

    pub fn srt(&self) -> String {
        to_srt(&self.groups)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
