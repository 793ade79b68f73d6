//! Progressive caption reveal inside a text segment.
//!
//! Caption groups overlapping the segment are laid out as lines and chunked
//! into stacks of `style.stack` lines. Within a stack every word gets its own
//! reveal step that shows all earlier lines in full and the current line up
//! to and including that word.

use crate::highlight::HighlightIndex;
use crate::segment::TextSegment;
use crate::types::{CaptionGroup, Word};

use super::{Emitter, Layer, RenderInstruction, StyledWord};

/// How long a trailing zero-length word stays on screen.
const LAST_WORD_HOLD_SECS: f64 = 0.1;

struct Line<'a> {
    group: &'a CaptionGroup,
    /// Group end, stretched to the next group's start to close gaps.
    end: f64,
}

struct Placed<'a> {
    line: usize,
    word: &'a Word,
    styled: StyledWord,
}

pub(super) fn segment(
    segment: &TextSegment,
    groups: &[CaptionGroup],
    words: &[Word],
    highlights: &HighlightIndex,
    out: &mut Emitter<'_>,
) {
    let timing = segment.timing;
    let mut lines: Vec<Line<'_>> = groups
        .iter()
        .filter(|g| g.overlaps(timing.start, timing.end))
        .map(|group| Line {
            group,
            end: group.end,
        })
        .collect();

    for i in 1..lines.len() {
        let next_start = lines[i].group.start;
        if lines[i - 1].end < next_start {
            lines[i - 1].end = next_start;
        }
    }

    for stack in lines.chunks(segment.style.stack_lines()) {
        reveal_stack(segment, stack, words, highlights, out);
    }
}

fn reveal_stack(
    segment: &TextSegment,
    stack: &[Line<'_>],
    words: &[Word],
    highlights: &HighlightIndex,
    out: &mut Emitter<'_>,
) {
    let stack_start = stack[0].group.start;
    let stack_end = stack[stack.len() - 1].end;
    let window_start = stack_start.max(segment.timing.start);
    let window_end = stack_end.min(segment.timing.end);

    let mut in_stack: Vec<&Word> = words
        .iter()
        .filter(|w| w.within(stack_start, stack_end))
        .collect();
    in_stack.sort_by(|a, b| a.start.total_cmp(&b.start));

    let placed: Vec<Placed<'_>> = in_stack
        .into_iter()
        .filter_map(|word| {
            let line = stack
                .iter()
                .position(|l| word.within(l.group.start, l.end))?;
            let group = stack[line].group;
            let color = highlights
                .color_of(&word.word, group.start, group.end)
                .unwrap_or(segment.style.color.as_str())
                .to_string();
            Some(Placed {
                line,
                word,
                styled: StyledWord {
                    text: word.word.clone(),
                    color,
                },
            })
        })
        .collect();

    for (i, current) in placed.iter().enumerate() {
        let next_start = placed.get(i + 1).map(|p| p.word.start);
        let start = current.word.start;
        let mut end = current.word.end;

        if current.word.is_degenerate() {
            end = match next_start {
                Some(next) => start + (next - start) / 4.0,
                None => start + LAST_WORD_HOLD_SECS,
            };
        }
        if let Some(next) = next_start
            && end < next
        {
            end = next;
        }

        let from = start.max(window_start);
        let to = end.min(window_end);
        if to <= from {
            continue;
        }

        let lines: Vec<Vec<StyledWord>> = (0..stack.len())
            .map(|line| {
                placed
                    .iter()
                    .filter(|p| {
                        p.line == line
                            && (line < current.line
                                || (line == current.line && p.word.start <= start))
                    })
                    .map(|p| p.styled.clone())
                    .collect::<Vec<_>>()
            })
            .collect();

        out.push_secs(
            Layer::Caption,
            from,
            to - from,
            RenderInstruction::Caption {
                segment_id: segment.id.clone(),
                lines,
                style: segment.style.clone(),
            },
        );
    }
}
