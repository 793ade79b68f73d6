use std::collections::BTreeMap;

use crate::error::{Error, Result, check_duration, check_index, check_volume};

pub const DEFAULT_TRANSITION_VOLUME: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct TransitionAsset {
    pub url: Option<String>,
    pub name: String,
    pub duration: f64,
    pub volume: f64,
}

impl TransitionAsset {
    pub fn new(url: impl Into<String>, name: impl Into<String>, duration: f64) -> Self {
        Self {
            url: Some(url.into()),
            name: name.into(),
            duration,
            volume: DEFAULT_TRANSITION_VOLUME,
        }
    }
}

/// What plays at the boundary between frame `i` and frame `i + 1`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize, specta::Type,
)]
#[serde(tag = "mode", content = "asset", rename_all = "snake_case")]
pub enum BoundarySelection {
    /// Cycle through the uploaded assets by boundary index.
    #[default]
    Auto,
    Disabled,
    Explicit(usize),
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct Transitions {
    assets: Vec<TransitionAsset>,
    #[serde(default)]
    selections: BTreeMap<usize, BoundarySelection>,
}

impl Transitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assets(&self) -> &[TransitionAsset] {
        &self.assets
    }

    pub fn selection(&self, boundary: usize) -> BoundarySelection {
        self.selections.get(&boundary).copied().unwrap_or_default()
    }

    pub fn add(&mut self, asset: TransitionAsset) -> Result<usize> {
        check_duration(asset.duration)?;
        check_volume(asset.volume)?;
        self.assets.push(asset);
        Ok(self.assets.len() - 1)
    }

    /// Removes an asset. Boundaries pinned to it fall back to `Auto`; pins to
    /// later assets shift down with them.
    pub fn remove(&mut self, index: usize) -> Result<TransitionAsset> {
        check_index(index, self.assets.len())
            .map_err(|_| Error::UnknownTransition(index))?;
        let removed = self.assets.remove(index);

        self.selections.retain(|_, sel| *sel != BoundarySelection::Explicit(index));
        for sel in self.selections.values_mut() {
            if let BoundarySelection::Explicit(i) = sel
                && *i > index
            {
                *i -= 1;
            }
        }
        Ok(removed)
    }

    pub fn select(&mut self, boundary: usize, selection: BoundarySelection) -> Result<()> {
        if let BoundarySelection::Explicit(i) = selection
            && i >= self.assets.len()
        {
            return Err(Error::UnknownTransition(i));
        }
        match selection {
            BoundarySelection::Auto => self.selections.remove(&boundary),
            other => self.selections.insert(boundary, other),
        };
        Ok(())
    }

    pub fn set_volume(&mut self, index: usize, volume: f64) -> Result<()> {
        check_volume(volume)?;
        let asset = self
            .assets
            .get_mut(index)
            .ok_or(Error::UnknownTransition(index))?;
        asset.volume = volume;
        Ok(())
    }

    /// The asset that plays at `boundary`, with its index.
    pub fn resolve(&self, boundary: usize) -> Option<(usize, &TransitionAsset)> {
        let index = match self.selection(boundary) {
            BoundarySelection::Auto if !self.assets.is_empty() => boundary % self.assets.len(),
            BoundarySelection::Auto | BoundarySelection::Disabled => return None,
            BoundarySelection::Explicit(i) => i,
        };
        self.assets.get(index).map(|asset| (index, asset))
    }
}
