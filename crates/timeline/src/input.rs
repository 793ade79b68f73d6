use crate::repair::{RepairConfig, repair_with};
use crate::types::{Word, sort_by_start};

/// Word-granularity transcription output as returned by the speech-to-text
/// collaborator (`verbose_json` with word timestamps).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct TranscriptionResponse {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub words: Vec<TranscriptionWord>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct TranscriptionWord {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

/// Provider-agnostic caption input, already cleaned and repaired.
///
/// Build one with [`TranscriptInput::from_response`] or construct it directly
/// when the words come from somewhere other than a transcription call.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptInput {
    pub words: Vec<Word>,
    /// Length of the narration audio, when the provider reports it.
    pub duration: Option<f64>,
}

impl TranscriptInput {
    pub fn from_response(response: &TranscriptionResponse) -> Option<Self> {
        Self::from_response_with(response, &RepairConfig::default())
    }

    /// Drops blank or non-finite entries, orders the rest by start and repairs
    /// degenerate timings. Returns `None` when no usable word is left.
    pub fn from_response_with(
        response: &TranscriptionResponse,
        config: &RepairConfig,
    ) -> Option<Self> {
        let mut words: Vec<Word> = response
            .words
            .iter()
            .filter(|w| w.start.is_finite() && w.end.is_finite())
            .filter_map(|w| {
                let text = w.word.trim();
                (!text.is_empty()).then(|| Word::new(text, w.start, w.end))
            })
            .collect();

        if words.is_empty() {
            return None;
        }
        sort_by_start(&mut words);

        Some(Self {
            words: repair_with(&words, config),
            duration: response.duration.filter(|d| d.is_finite() && *d > 0.0),
        })
    }
}
