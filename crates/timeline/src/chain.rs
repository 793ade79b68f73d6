//! Ordered tracks whose items sit back to back starting at 0.
//!
//! Structural mutations (append, insert, replace, remove, move) always leave
//! the chain contiguous: `items[0].start == 0` and every item starts where the
//! previous one ends. Every mutation validates its input before touching any
//! item, so a rejected call leaves the chain exactly as it was.

use crate::error::{Error, Result, check_duration, check_index, check_start};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct TimedItem<T> {
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    pub payload: T,
}

/// One field of the `start + duration = end` triple, set through a form.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldEdit {
    Start(f64),
    Duration(f64),
    End(f64),
}

/// Whether a direct field edit on one chain item moves the items after it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize, specta::Type,
)]
#[serde(rename_all = "snake_case")]
pub enum EditPropagation {
    /// Only the edited item changes. Later items keep their timings until the
    /// next structural mutation or an explicit [`Chain::rechain`].
    #[default]
    Isolated,
    /// Items after the edited one are re-chained immediately.
    Downstream,
}

/// Apply `edit` to a `(start, duration, end)` triple.
///
/// Editing start or duration recomputes end; editing end recomputes duration.
pub(crate) fn edit_timing(start: f64, duration: f64, edit: FieldEdit) -> Result<(f64, f64, f64)> {
    match edit {
        FieldEdit::Start(start) => {
            check_start(start)?;
            Ok((start, duration, start + duration))
        }
        FieldEdit::Duration(duration) => {
            check_duration(duration)?;
            Ok((start, duration, start + duration))
        }
        FieldEdit::End(end) => {
            if !end.is_finite() || end <= start {
                return Err(Error::EndNotAfterStart { start, end });
            }
            Ok((start, end - start, end))
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(transparent)]
pub struct Chain<T> {
    items: Vec<TimedItem<T>>,
}

impl<T> Chain<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn items(&self) -> &[TimedItem<T>] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimedItem<T>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TimedItem<T>> {
        self.items.get(index)
    }

    /// End of the last item, or 0 for an empty chain.
    pub fn total_duration(&self) -> f64 {
        self.items.last().map_or(0.0, |item| item.end)
    }

    /// Mutable access to an item's payload. Timings stay owned by the chain.
    pub fn payload_mut(&mut self, index: usize) -> Result<&mut T> {
        check_index(index, self.items.len())?;
        Ok(&mut self.items[index].payload)
    }

    /// Returns the index of the new item.
    pub fn append(&mut self, duration: f64, payload: T) -> Result<usize> {
        check_duration(duration)?;
        let start = self.total_duration();
        self.items.push(TimedItem {
            start,
            end: start + duration,
            duration,
            payload,
        });
        Ok(self.items.len() - 1)
    }

    /// Insert before `index` (`index == len` appends) and shift the rest.
    pub fn insert(&mut self, index: usize, duration: f64, payload: T) -> Result<()> {
        check_index(index, self.items.len() + 1)?;
        check_duration(duration)?;
        self.items.insert(
            index,
            TimedItem {
                start: 0.0,
                end: duration,
                duration,
                payload,
            },
        );
        self.rechain_from(index);
        Ok(())
    }

    /// Swap the item at `index` for a new payload and duration.
    ///
    /// The item keeps its start; everything after it is re-chained with
    /// durations preserved. Returns the previous item.
    pub fn replace(&mut self, index: usize, duration: f64, payload: T) -> Result<TimedItem<T>> {
        check_index(index, self.items.len())?;
        check_duration(duration)?;

        let start = self.items[index].start;
        let old = std::mem::replace(
            &mut self.items[index],
            TimedItem {
                start,
                end: start + duration,
                duration,
                payload,
            },
        );
        self.rechain_from(index + 1);
        Ok(old)
    }

    pub fn remove(&mut self, index: usize) -> Result<TimedItem<T>> {
        check_index(index, self.items.len())?;
        let removed = self.items.remove(index);
        self.rechain_from(index);
        Ok(removed)
    }

    /// Move the item at `from` so it ends up at position `to`, then re-chain
    /// the whole track.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        check_index(from, self.items.len())?;
        check_index(to, self.items.len())?;
        let item = self.items.remove(from);
        self.items.insert(to, item);
        self.rechain_from(0);
        Ok(())
    }

    pub fn edit(&mut self, index: usize, edit: FieldEdit, propagation: EditPropagation) -> Result<()> {
        check_index(index, self.items.len())?;
        let item = &self.items[index];
        let (start, duration, end) = edit_timing(item.start, item.duration, edit)?;

        let item = &mut self.items[index];
        item.start = start;
        item.duration = duration;
        item.end = end;

        if propagation == EditPropagation::Downstream {
            self.rechain_from(index + 1);
        }
        Ok(())
    }

    /// Restore contiguity across the whole chain, keeping every duration.
    pub fn rechain(&mut self) {
        self.rechain_from(0);
    }

    /// Whether the chain currently satisfies the contiguity invariant.
    pub fn is_contiguous(&self) -> bool {
        self.items.first().is_none_or(|first| first.start == 0.0)
            && self
                .items
                .windows(2)
                .all(|pair| pair[1].start == pair[0].end)
    }

    fn rechain_from(&mut self, index: usize) {
        for i in index..self.items.len() {
            let start = match i {
                0 => 0.0,
                _ => self.items[i - 1].end,
            };
            let item = &mut self.items[i];
            item.start = start;
            item.end = start + item.duration;
        }
    }
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a Chain<T> {
    type Item = &'a TimedItem<T>;
    type IntoIter = std::slice::Iter<'a, TimedItem<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use quickcheck::Arbitrary;

    fn spans<T>(chain: &Chain<T>) -> Vec<(f64, f64)> {
        chain.iter().map(|item| (item.start, item.end)).collect()
    }

    fn chain_of(durations: &[f64]) -> Chain<usize> {
        let mut chain = Chain::new();
        for (i, d) in durations.iter().enumerate() {
            chain.append(*d, i).unwrap();
        }
        chain
    }

    #[test]
    fn append_builds_contiguous_chain() {
        let chain = chain_of(&[4.0, 6.0, 2.0]);
        assert_eq!(spans(&chain), vec![(0.0, 4.0), (4.0, 10.0), (10.0, 12.0)]);
    }

    #[test]
    fn remove_rechains_later_items() {
        let mut chain = chain_of(&[4.0, 6.0, 2.0]);
        let removed = chain.remove(1).unwrap();

        assert_eq!(removed.payload, 1);
        assert_eq!(spans(&chain), vec![(0.0, 4.0), (4.0, 6.0)]);
        assert_eq!(chain.get(1).unwrap().duration, 2.0);
    }

    #[test]
    fn remove_first_restarts_at_zero() {
        let mut chain = chain_of(&[4.0, 6.0]);
        chain.remove(0).unwrap();
        assert_eq!(spans(&chain), vec![(0.0, 6.0)]);
    }

    #[test]
    fn replace_keeps_start_and_downstream_durations() {
        let mut chain = chain_of(&[4.0, 6.0, 2.0]);
        let old = chain.replace(1, 3.0, 9).unwrap();

        assert_eq!(old.payload, 1);
        assert_eq!(spans(&chain), vec![(0.0, 4.0), (4.0, 7.0), (7.0, 9.0)]);
        assert_eq!(chain.get(1).unwrap().payload, 9);
    }

    #[test]
    fn insert_shifts_following_items() {
        let mut chain = chain_of(&[4.0, 2.0]);
        chain.insert(1, 1.0, 7).unwrap();
        assert_eq!(spans(&chain), vec![(0.0, 4.0), (4.0, 5.0), (5.0, 7.0)]);

        chain.insert(3, 3.0, 8).unwrap();
        assert_eq!(chain.total_duration(), 10.0);
        assert!(chain.insert(9, 1.0, 0).is_err());
    }

    #[test]
    fn move_reorders_and_rechains() {
        let mut chain = chain_of(&[4.0, 6.0, 2.0]);
        chain.move_item(2, 0).unwrap();

        let payloads: Vec<usize> = chain.iter().map(|item| item.payload).collect();
        assert_eq!(payloads, vec![2, 0, 1]);
        assert_eq!(spans(&chain), vec![(0.0, 2.0), (2.0, 6.0), (6.0, 12.0)]);
    }

    #[test]
    fn isolated_edit_leaves_later_items_alone() {
        let mut chain = chain_of(&[4.0, 6.0]);
        chain
            .edit(0, FieldEdit::Duration(5.0), EditPropagation::Isolated)
            .unwrap();

        assert_eq!(spans(&chain), vec![(0.0, 5.0), (4.0, 10.0)]);
        assert!(!chain.is_contiguous());

        chain.rechain();
        assert_eq!(spans(&chain), vec![(0.0, 5.0), (5.0, 11.0)]);
    }

    #[test]
    fn downstream_edit_rechains_later_items() {
        let mut chain = chain_of(&[4.0, 6.0, 2.0]);
        chain
            .edit(1, FieldEdit::End(8.0), EditPropagation::Downstream)
            .unwrap();

        assert_eq!(spans(&chain), vec![(0.0, 4.0), (4.0, 8.0), (8.0, 10.0)]);
        assert_eq!(chain.get(1).unwrap().duration, 4.0);
    }

    #[test]
    fn edit_start_moves_end() {
        let mut chain = chain_of(&[4.0]);
        chain
            .edit(0, FieldEdit::Start(1.5), EditPropagation::Isolated)
            .unwrap();
        assert_eq!(spans(&chain), vec![(1.5, 5.5)]);
    }

    #[test]
    fn invalid_edits_are_rejected_without_change() {
        let mut chain = chain_of(&[4.0, 6.0]);
        let before = chain.clone();

        assert!(matches!(
            chain.edit(1, FieldEdit::End(4.0), EditPropagation::Downstream),
            Err(Error::EndNotAfterStart { .. })
        ));
        assert!(matches!(
            chain.edit(0, FieldEdit::Duration(0.0), EditPropagation::Downstream),
            Err(Error::InvalidDuration(_))
        ));
        assert!(matches!(
            chain.edit(0, FieldEdit::Start(-1.0), EditPropagation::Downstream),
            Err(Error::NegativeStart(_))
        ));
        assert!(matches!(
            chain.append(f64::NAN, 3),
            Err(Error::InvalidDuration(_))
        ));
        assert!(matches!(
            chain.move_item(0, 2),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        ));

        assert_eq!(chain, before);
    }

    #[test]
    fn payload_mut_does_not_touch_timing() {
        let mut chain = chain_of(&[4.0]);
        *chain.payload_mut(0).unwrap() = 42;
        assert_eq!(chain.get(0).unwrap().payload, 42);
        assert_eq!(spans(&chain), vec![(0.0, 4.0)]);
    }

    #[test]
    fn serializes_as_plain_list() {
        let chain = chain_of(&[2.0]);
        let json = serde_json::to_value(&chain).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "start": 0.0, "end": 2.0, "duration": 2.0, "payload": 0 }])
        );
    }

    #[derive(Debug, Clone)]
    enum Op {
        Append(f64),
        Insert(usize, f64),
        Replace(usize, f64),
        Remove(usize),
        Move(usize, usize),
    }

    impl Arbitrary for Op {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let duration = (u16::arbitrary(g) % 1000 + 1) as f64 / 100.0;
            let a = usize::arbitrary(g) % 8;
            let b = usize::arbitrary(g) % 8;
            match u8::arbitrary(g) % 5 {
                0 => Op::Append(duration),
                1 => Op::Insert(a, duration),
                2 => Op::Replace(a, duration),
                3 => Op::Remove(a),
                _ => Op::Move(a, b),
            }
        }
    }

    fn run(ops: &[Op]) -> Chain<()> {
        let mut chain = Chain::new();
        for op in ops {
            // Out-of-range indices are rejected and leave the chain as is.
            let _ = match *op {
                Op::Append(d) => chain.append(d, ()).map(|_| ()),
                Op::Insert(i, d) => chain.insert(i, d, ()),
                Op::Replace(i, d) => chain.replace(i, d, ()).map(|_| ()),
                Op::Remove(i) => chain.remove(i).map(|_| ()),
                Op::Move(a, b) => chain.move_item(a, b),
            };
        }
        chain
    }

    #[quickcheck_macros::quickcheck]
    fn prop_structural_ops_keep_chain_contiguous(ops: Vec<Op>) -> bool {
        run(&ops).is_contiguous()
    }

    #[quickcheck_macros::quickcheck]
    fn prop_end_minus_start_equals_duration(ops: Vec<Op>) -> bool {
        run(&ops)
            .iter()
            .all(|item| (item.end - item.start - item.duration).abs() < 1e-6)
    }

    #[test]
    fn three_way_edit_keeps_duration_consistent() {
        let mut chain = chain_of(&[1.1, 2.2]);
        chain
            .edit(1, FieldEdit::End(3.7), EditPropagation::Isolated)
            .unwrap();
        let item = chain.get(1).unwrap();
        assert_abs_diff_eq!(item.end - item.start, item.duration, epsilon = 1e-6);
    }
}
