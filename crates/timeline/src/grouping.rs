use std::ops::Range;

use itertools::Itertools;

use crate::error::{Error, Result, check_index};
use crate::types::{CaptionGroup, Word};

pub const DEFAULT_GROUP_SIZE: usize = 3;
/// Highest group index a policy can customize, plus one.
pub const MAX_CUSTOM_GROUPS: usize = 10_000;

/// Words per caption group, one entry per group.
///
/// Once the entries run out the last one repeats. An empty policy means one
/// word per group. Zero entries can only arrive through deserialization and
/// are treated as 1.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(transparent)]
pub struct GroupSizePolicy(Vec<usize>);

impl GroupSizePolicy {
    pub fn new(sizes: Vec<usize>) -> Result<Self> {
        if sizes.contains(&0) {
            return Err(Error::InvalidGroupSize);
        }
        Ok(Self(sizes))
    }

    pub fn uniform(size: usize) -> Result<Self> {
        Self::new(vec![size])
    }

    pub fn sizes(&self) -> &[usize] {
        &self.0
    }

    /// Size requested for the group at `index`, before truncation.
    pub fn size_for(&self, index: usize) -> usize {
        let size = match self.0.get(index) {
            Some(size) => *size,
            None => self.0.last().copied().unwrap_or(1),
        };
        size.max(1)
    }

    /// Customize one group's size. Entries between the current end of the
    /// policy and `index` are filled with the size currently in effect for
    /// them, so earlier groups keep their layout.
    pub fn set(&mut self, index: usize, size: usize) -> Result<()> {
        if size == 0 {
            return Err(Error::InvalidGroupSize);
        }
        check_index(index, MAX_CUSTOM_GROUPS)?;
        while self.0.len() <= index {
            let fill = self.size_for(self.0.len());
            self.0.push(fill);
        }
        self.0[index] = size;
        Ok(())
    }
}

impl Default for GroupSizePolicy {
    fn default() -> Self {
        Self(vec![DEFAULT_GROUP_SIZE])
    }
}

/// Index ranges of each group over a word list of length `len`.
pub fn group_ranges(len: usize, policy: &GroupSizePolicy) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut cursor = 0;

    while cursor < len {
        let size = policy.size_for(ranges.len()).min(len - cursor);
        ranges.push(cursor..cursor + size);
        cursor += size;
    }

    ranges
}

pub fn group(words: &[Word], policy: &GroupSizePolicy) -> Vec<CaptionGroup> {
    group_ranges(words.len(), policy)
        .into_iter()
        .map(|range| {
            let chunk = &words[range];
            CaptionGroup {
                start: chunk[0].start,
                end: chunk[chunk.len() - 1].end,
                text: chunk.iter().map(|w| w.word.as_str()).join(" "),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{Arbitrary, TestResult};

    fn words(n: usize) -> Vec<Word> {
        (0..n)
            .map(|i| Word::new(format!("w{i}"), i as f64, i as f64 + 0.5))
            .collect()
    }

    fn sizes_of(groups: &[Range<usize>]) -> Vec<usize> {
        groups.iter().map(|r| r.len()).collect()
    }

    #[test]
    fn last_size_repeats_and_final_group_truncates() {
        let policy = GroupSizePolicy::uniform(3).unwrap();
        assert_eq!(sizes_of(&group_ranges(7, &policy)), vec![3, 3, 1]);
    }

    #[test]
    fn per_group_sizes_are_consumed_in_order() {
        let policy = GroupSizePolicy::new(vec![1, 2, 4]).unwrap();
        assert_eq!(sizes_of(&group_ranges(12, &policy)), vec![1, 2, 4, 4, 1]);
    }

    #[test]
    fn empty_policy_groups_one_word_each() {
        let policy = GroupSizePolicy::new(vec![]).unwrap();
        assert_eq!(sizes_of(&group_ranges(3, &policy)), vec![1, 1, 1]);
    }

    #[test]
    fn empty_words_yield_no_groups() {
        assert!(group(&[], &GroupSizePolicy::default()).is_empty());
    }

    #[test]
    fn group_spans_first_start_to_last_end() {
        let groups = group(&words(4), &GroupSizePolicy::uniform(3).unwrap());

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].text, "w0 w1 w2");
        assert_eq!((groups[0].start, groups[0].end), (0.0, 2.5));
        assert_eq!(groups[1].text, "w3");
        assert_eq!((groups[1].start, groups[1].end), (3.0, 3.5));
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            GroupSizePolicy::new(vec![2, 0]),
            Err(Error::InvalidGroupSize)
        ));
        let mut policy = GroupSizePolicy::default();
        assert!(policy.set(0, 0).is_err());
        assert_eq!(policy.sizes(), &[DEFAULT_GROUP_SIZE]);
    }

    #[test]
    fn set_fills_gap_with_effective_sizes() {
        let mut policy = GroupSizePolicy::new(vec![2]).unwrap();
        policy.set(3, 5).unwrap();
        assert_eq!(policy.sizes(), &[2, 2, 2, 5]);
        assert_eq!(policy.size_for(10), 5);
    }

    #[test]
    fn far_indices_are_rejected_without_growing() {
        let mut policy = GroupSizePolicy::new(vec![2]).unwrap();
        assert!(matches!(
            policy.set(usize::MAX, 2),
            Err(Error::IndexOutOfRange { len: MAX_CUSTOM_GROUPS, .. })
        ));
        assert!(policy.set(MAX_CUSTOM_GROUPS, 2).is_err());
        assert_eq!(policy.sizes(), &[2]);

        policy.set(MAX_CUSTOM_GROUPS - 1, 4).unwrap();
        assert_eq!(policy.sizes().len(), MAX_CUSTOM_GROUPS);
    }

    #[test]
    fn deserialized_zero_is_treated_as_one() {
        let policy: GroupSizePolicy = serde_json::from_str("[0]").unwrap();
        assert_eq!(sizes_of(&group_ranges(2, &policy)), vec![1, 1]);
    }

    #[derive(Debug, Clone)]
    struct Sizes(Vec<usize>);

    impl Arbitrary for Sizes {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let count = usize::arbitrary(g) % 6;
            Sizes((0..count).map(|_| usize::arbitrary(g) % 5 + 1).collect())
        }
    }

    #[quickcheck_macros::quickcheck]
    fn prop_groups_cover_every_word_once(len: u8, sizes: Sizes) -> TestResult {
        if sizes.0.is_empty() {
            return TestResult::discard();
        }
        let policy = GroupSizePolicy::new(sizes.0).unwrap();
        let ranges = group_ranges(len as usize, &policy);

        let total: usize = ranges.iter().map(|r| r.len()).sum();
        let flattened: Vec<usize> = ranges.into_iter().flatten().collect();
        let expected: Vec<usize> = (0..len as usize).collect();

        TestResult::from_bool(total == len as usize && flattened == expected)
    }

    #[quickcheck_macros::quickcheck]
    fn prop_group_text_concatenates_words(len: u8, sizes: Sizes) -> bool {
        let input = words(len as usize % 40);
        let policy = GroupSizePolicy::new(sizes.0).unwrap();
        let joined = group(&input, &policy)
            .iter()
            .map(|g| g.text.as_str())
            .join(" ");
        joined == input.iter().map(|w| w.word.as_str()).join(" ")
    }
}
