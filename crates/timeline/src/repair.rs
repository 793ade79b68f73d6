use crate::types::Word;

pub const MIN_WORD_DURATION: f64 = 0.05;
pub const GAP_BETWEEN_WORDS: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct RepairConfig {
    pub min_word_duration: f64,
    pub gap_between_words: f64,
}

impl RepairConfig {
    pub fn new() -> Self {
        Self {
            min_word_duration: MIN_WORD_DURATION,
            gap_between_words: GAP_BETWEEN_WORDS,
        }
    }

    pub fn with_min_word_duration(mut self, secs: f64) -> Self {
        self.min_word_duration = secs;
        self
    }

    pub fn with_gap_between_words(mut self, secs: f64) -> Self {
        self.gap_between_words = secs;
        self
    }
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Repair degenerate word timings with the default thresholds.
pub fn repair(words: &[Word]) -> Vec<Word> {
    repair_with(words, &RepairConfig::default())
}

/// Single left-to-right pass over a copy of `words`.
///
/// Each word gets at least `min_word_duration` and the following word is
/// pushed forward so it starts at least `gap_between_words` after the current
/// one ends. Pushes can cascade; the pass never revisits a word, so a long run
/// of crowded words drifts later than its source timings instead of being
/// redistributed.
pub fn repair_with(words: &[Word], config: &RepairConfig) -> Vec<Word> {
    let min = config.min_word_duration;
    let gap = config.gap_between_words;
    let mut out = words.to_vec();

    for i in 0..out.len() {
        let next_start = out.get(i + 1).map(|w| w.start);
        let word = &mut out[i];

        if word.is_degenerate() {
            word.end = match next_start {
                Some(next) => word.start + f64::max(min, (next - word.start) / 4.0),
                None => word.start + min,
            };
        }

        if word.end - word.start < min {
            word.end = word.start + min;
        }

        let end = word.end;
        if let Some(next) = out.get_mut(i + 1)
            && end + gap > next.start
        {
            next.start = end + gap;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use quickcheck::Arbitrary;

    const EPS: f64 = 1e-9;

    #[test]
    fn degenerate_first_word_pushes_next() {
        let words = vec![Word::new("the", 0.0, 0.0), Word::new("cat", 0.3, 0.5)];
        let out = repair(&words);

        assert!(out[0].end >= MIN_WORD_DURATION);
        assert!(out[0].end + GAP_BETWEEN_WORDS <= out[1].start + EPS);
        // (0.3 - 0) / 4 beats the minimum.
        assert_abs_diff_eq!(out[0].end, 0.075, epsilon = EPS);
        assert_abs_diff_eq!(out[1].start, 0.3, epsilon = EPS);
    }

    #[test]
    fn crowded_degenerate_word_pushes_next_start() {
        let words = vec![Word::new("a", 1.0, 1.0), Word::new("b", 1.02, 1.4)];
        let out = repair(&words);

        assert_abs_diff_eq!(out[0].end, 1.05, epsilon = EPS);
        assert_abs_diff_eq!(out[1].start, 1.1, epsilon = EPS);
        assert_abs_diff_eq!(out[1].end, 1.4, epsilon = EPS);
    }

    #[test]
    fn last_degenerate_word_gets_minimum() {
        let out = repair(&[Word::new("end", 2.0, 2.0)]);
        assert_abs_diff_eq!(out[0].end, 2.05, epsilon = EPS);
    }

    #[test]
    fn pushed_word_is_extended_when_reached() {
        let words = vec![
            Word::new("a", 0.0, 0.5),
            Word::new("b", 0.5, 0.52),
            Word::new("c", 0.6, 0.9),
        ];
        let out = repair(&words);

        assert_abs_diff_eq!(out[1].start, 0.55, epsilon = EPS);
        assert_abs_diff_eq!(out[1].end, 0.6, epsilon = EPS);
        assert_abs_diff_eq!(out[2].start, 0.65, epsilon = EPS);
    }

    #[test]
    fn valid_words_are_untouched() {
        let words = vec![Word::new("hello", 0.0, 0.4), Word::new("world", 0.5, 0.9)];
        assert_eq!(repair(&words), words);
    }

    #[test]
    fn empty_input() {
        assert!(repair(&[]).is_empty());
    }

    #[test]
    fn custom_thresholds() {
        let config = RepairConfig::new()
            .with_min_word_duration(0.2)
            .with_gap_between_words(0.1);
        let out = repair_with(&[Word::new("a", 0.0, 0.0), Word::new("b", 0.1, 0.5)], &config);

        assert_abs_diff_eq!(out[0].end, 0.2, epsilon = EPS);
        assert_abs_diff_eq!(out[1].start, 0.3, epsilon = EPS);
    }

    #[derive(Debug, Clone)]
    struct Timings(Vec<Word>);

    impl Arbitrary for Timings {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let count = usize::arbitrary(g) % 24;
            let mut cursor = 0.0;
            let words = (0..count)
                .map(|i| {
                    cursor += (u8::arbitrary(g) % 40) as f64 / 100.0;
                    let len = match u8::arbitrary(g) % 3 {
                        0 => 0.0,
                        _ => (u8::arbitrary(g) % 60) as f64 / 100.0,
                    };
                    Word::new(format!("w{i}"), cursor, cursor + len)
                })
                .collect();
            Timings(words)
        }
    }

    #[quickcheck_macros::quickcheck]
    fn prop_repaired_words_have_min_duration_and_gap(input: Timings) -> bool {
        let out = repair(&input.0);
        out.iter()
            .all(|w| w.end - w.start >= MIN_WORD_DURATION - EPS)
            && out
                .windows(2)
                .all(|pair| pair[1].start - pair[0].end >= GAP_BETWEEN_WORDS - EPS)
    }

    #[quickcheck_macros::quickcheck]
    fn prop_repair_preserves_text_and_order(input: Timings) -> bool {
        let out = repair(&input.0);
        out.len() == input.0.len()
            && out.iter().zip(&input.0).all(|(a, b)| a.word == b.word)
            && out.windows(2).all(|pair| pair[0].start <= pair[1].start)
    }
}
