use itertools::Itertools;

use crate::types::CaptionGroup;

/// `HH:MM:SS,mmm`, rounded to the nearest millisecond.
pub fn format_timestamp(secs: f64) -> String {
    let total_ms = (secs.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = total_ms % 3_600_000 / 60_000;
    let seconds = total_ms % 60_000 / 1000;
    let millis = total_ms % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
}

pub fn to_srt(groups: &[CaptionGroup]) -> String {
    groups
        .iter()
        .enumerate()
        .map(|(i, group)| {
            format!(
                "{}\n{} --> {}\n{}\n",
                i + 1,
                format_timestamp(group.start),
                format_timestamp(group.end),
                group.text
            )
        })
        .join("\n")
}
