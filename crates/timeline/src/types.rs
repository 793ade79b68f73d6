/// A single transcribed word with timings in seconds.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct Word {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

impl Word {
    pub fn new(word: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            word: word.into(),
            start,
            end,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// Whether the whole word lies inside `[start, end]`.
    pub fn within(&self, start: f64, end: f64) -> bool {
        self.start >= start && self.end <= end
    }
}

/// A display caption: a run of consecutive words shown together.
///
/// Always derived from the word list and the group-size policy; never edited
/// directly.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct CaptionGroup {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl CaptionGroup {
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        self.end > start && self.start < end
    }
}

/// Field-level edit of one word in the caption list.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum WordEdit {
    Text(String),
    Start(f64),
    End(f64),
}

pub(crate) fn sort_by_start(words: &mut [Word]) {
    words.sort_by(|a, b| a.start.total_cmp(&b.start));
}
