#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("index {index} is out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("duration must be a positive number of seconds, got {0}")]
    InvalidDuration(f64),
    #[error("start must not be negative, got {0}")]
    NegativeStart(f64),
    #[error("end ({end}) must be after start ({start})")]
    EndNotAfterStart { start: f64, end: f64 },
    #[error("trim window [{start_from}, {end_at}] does not fit a source of {duration}s")]
    InvalidTrimWindow {
        start_from: f64,
        end_at: f64,
        duration: f64,
    },
    #[error("volume must lie in [0, 1], got {0}")]
    InvalidVolume(f64),
    #[error("word text must not be empty")]
    EmptyWord,
    #[error("caption group size must be at least 1")]
    InvalidGroupSize,
    #[error("text segment {0} not found")]
    UnknownSegment(String),
    #[error("bgm track {0} not found")]
    UnknownBgmTrack(String),
    #[error("bgm point {0} not found")]
    UnknownBgmPoint(u32),
    #[error("transition {0} not found")]
    UnknownTransition(usize),
    #[error("collaborator failed: {0}")]
    Collaborator(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(Error::IndexOutOfRange { index, len })
    }
}

pub(crate) fn check_duration(duration: f64) -> Result<()> {
    if duration.is_finite() && duration > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidDuration(duration))
    }
}

pub(crate) fn check_start(start: f64) -> Result<()> {
    if start.is_finite() && start >= 0.0 {
        Ok(())
    } else {
        Err(Error::NegativeStart(start))
    }
}

pub(crate) fn check_volume(volume: f64) -> Result<()> {
    if (0.0..=1.0).contains(&volume) {
        Ok(())
    } else {
        Err(Error::InvalidVolume(volume))
    }
}
