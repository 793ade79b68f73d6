use crate::chain::Chain;
use crate::media::{Background, Frame, MediaKind};
use crate::segment::{SecondaryTextSegment, Segments};
use crate::transition::Transitions;

use super::{Emitter, Layer, MediaSource, RenderInstruction};

/// Seconds a transition clip fades in and out over.
const TRANSITION_FADE_SECS: f64 = 1.0;

/// `None` when the asset URL is missing or blank.
fn media_source(url: Option<&String>, kind: MediaKind, looped: bool, muted: bool) -> Option<MediaSource> {
    let url = url.filter(|u| !u.is_empty())?.clone();
    Some(match kind {
        MediaKind::Image => MediaSource::Image { url },
        MediaKind::Video => MediaSource::Video { url, looped, muted },
    })
}

pub(super) fn backgrounds(chain: &Chain<Background>, out: &mut Emitter<'_>) {
    for (index, item) in chain.iter().enumerate() {
        let media = media_source(item.payload.url.as_ref(), item.payload.kind, true, true)
            .unwrap_or_else(|| {
                tracing::warn!(index, "background_asset_missing");
                out.placeholder()
            });
        out.push_secs(
            Layer::Background,
            item.start,
            item.duration,
            RenderInstruction::Background { index, media },
        );
    }
}

pub(super) fn frames(chain: &Chain<Frame>, out: &mut Emitter<'_>) {
    for (index, item) in chain.iter().enumerate() {
        let frame = &item.payload;
        let media = media_source(frame.url.as_ref(), frame.kind, false, false).unwrap_or_else(|| {
            tracing::warn!(index, "frame_asset_missing");
            out.placeholder()
        });
        out.push_secs(
            Layer::Frame,
            item.start,
            item.duration,
            RenderInstruction::Frame {
                index,
                template: frame.template,
                style: frame.style.clone(),
                media,
            },
        );
    }
}

/// One clip per frame boundary, ending exactly where the next frame starts.
pub(super) fn transitions(chain: &Chain<Frame>, transitions: &Transitions, out: &mut Emitter<'_>) {
    for (boundary, next) in chain.iter().skip(1).enumerate() {
        let Some((asset_index, asset)) = transitions.resolve(boundary) else {
            continue;
        };

        let duration_frames = out.config.frames_ceil(asset.duration);
        let start_frame = out.config.frame_floor(next.start) - duration_frames;
        let fade_frames = out
            .config
            .frames_ceil(TRANSITION_FADE_SECS)
            .min(duration_frames / 2);

        let media = media_source(asset.url.as_ref(), MediaKind::Video, false, false)
            .unwrap_or_else(|| {
                tracing::warn!(boundary, asset = asset_index, "transition_asset_missing");
                out.placeholder()
            });

        out.push_frames(
            Layer::Transition,
            start_frame,
            duration_frames,
            RenderInstruction::Transition {
                boundary,
                asset: asset_index,
                media,
                volume: asset.volume,
                fade_frames,
            },
        );
    }
}

pub(super) fn secondary_text(segments: &Segments<SecondaryTextSegment>, out: &mut Emitter<'_>) {
    for segment in segments {
        let timing = segment.timing;
        out.push_secs(
            Layer::Overlay,
            timing.start,
            timing.end - timing.start,
            RenderInstruction::Text {
                segment_id: segment.id.clone(),
                text: segment.text.clone(),
                style: segment.style.clone(),
            },
        );
    }
}
