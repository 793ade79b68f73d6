pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#FFD700";

/// A user-assigned color for one word inside one caption group.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(rename_all = "camelCase")]
pub struct WordHighlightEntry {
    pub word: String,
    pub color: String,
    pub caption_start: f64,
    pub caption_end: f64,
}

impl WordHighlightEntry {
    fn matches(&self, word: &str, caption_start: f64, caption_end: f64) -> bool {
        self.word == word && self.caption_start == caption_start && self.caption_end == caption_end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(rename_all = "snake_case")]
pub enum Toggle {
    Added,
    Removed,
}

/// Highlight colors keyed by `(word, caption_start, caption_end)`.
///
/// The same literal word in two caption groups is two independent entries.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(transparent)]
pub struct HighlightIndex {
    entries: Vec<WordHighlightEntry>,
}

impl HighlightIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[WordHighlightEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn color_of(&self, word: &str, caption_start: f64, caption_end: f64) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.matches(word, caption_start, caption_end))
            .map(|e| e.color.as_str())
    }

    /// Add an entry, or recolor it in place when the key already exists.
    pub fn set(&mut self, word: &str, color: &str, caption_start: f64, caption_end: f64) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.matches(word, caption_start, caption_end))
        {
            Some(existing) => existing.color = color.to_string(),
            None => self.entries.push(WordHighlightEntry {
                word: word.to_string(),
                color: color.to_string(),
                caption_start,
                caption_end,
            }),
        }
    }

    pub fn remove(&mut self, word: &str, caption_start: f64, caption_end: f64) -> Option<WordHighlightEntry> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.matches(word, caption_start, caption_end))?;
        Some(self.entries.remove(pos))
    }

    /// Click behaviour: an existing key is removed, a new one is added.
    pub fn toggle(&mut self, word: &str, color: &str, caption_start: f64, caption_end: f64) -> Toggle {
        if self.remove(word, caption_start, caption_end).is_some() {
            Toggle::Removed
        } else {
            self.set(word, color, caption_start, caption_end);
            Toggle::Added
        }
    }
}
