use crate::bgm::BgmTrack;
use crate::types::Word;

use super::{CueTrigger, Emitter, Layer, RenderInstruction, VolumeEnvelope};

/// Explicit point cues and text-triggered cues for every track.
///
/// Both kinds are emitted when both are configured, so a word inside an
/// enabled range plays on top of any point covering the same instant.
pub(super) fn music(tracks: &[BgmTrack], words: &[Word], narration_frames: i64, out: &mut Emitter<'_>) {
    let fade_frames = out.config.frames_ceil(out.config.fade_out_secs);

    for track in tracks {
        let volume = VolumeEnvelope {
            base: track.volume,
            fade_start_frame: narration_frames - fade_frames,
            fade_end_frame: narration_frames,
        };

        for point in &track.points {
            let start_from_frame = out.config.frames_ceil(point.start_from);
            let end_at_frame = out.config.frames_ceil(point.end_at);
            out.push_secs(
                Layer::Audio,
                point.start,
                point.duration,
                RenderInstruction::Music {
                    track_id: track.id.clone(),
                    url: track.url.clone(),
                    trigger: CueTrigger::Point { id: point.id },
                    start_from_frame,
                    end_at_frame,
                    volume,
                },
            );
        }

        if !track.text_points.toggle {
            continue;
        }

        let source_frames = out.config.frames_ceil(track.duration);
        for (range_index, range) in track.text_points.ranges.iter().enumerate() {
            for word in words.iter().filter(|w| range.contains(w.start, w.end)) {
                out.push_secs(
                    Layer::Audio,
                    word.start,
                    word.duration(),
                    RenderInstruction::Music {
                        track_id: track.id.clone(),
                        url: track.url.clone(),
                        trigger: CueTrigger::Word {
                            word: word.word.clone(),
                            range: range_index,
                        },
                        start_from_frame: 0,
                        end_at_frame: source_frames,
                        volume,
                    },
                );
            }
        }
    }
}
