//! Seams to the services the editor depends on but does not implement.
//!
//! All traits are object-safe through the explicit [`BoxFuture`] return type,
//! so the controller holds them as `Arc<dyn ...>`.

use std::future::Future;
use std::pin::Pin;

use crate::input::TranscriptionResponse;

pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    serde::Serialize,
    serde::Deserialize,
    specta::Type,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AssetKind {
    Frame,
    Background,
    Music,
    Transition,
}

/// A file handed over by the user, with its probed media length when known.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct SavedSession {
    pub id: String,
    pub name: String,
}

pub trait Transcriber: Send + Sync {
    fn transcribe<'a>(
        &'a self,
        audio: &'a [u8],
    ) -> BoxFuture<'a, Result<TranscriptionResponse, CollaboratorError>>;
}

/// Stores uploaded media and hands back URLs.
pub trait AssetStorage: Send + Sync {
    fn upload<'a>(
        &'a self,
        kind: AssetKind,
        upload: &'a Upload,
    ) -> BoxFuture<'a, Result<String, CollaboratorError>>;

    /// Overwrite the asset currently served at `url`, keeping its slot.
    fn replace<'a>(
        &'a self,
        kind: AssetKind,
        url: &'a str,
        upload: &'a Upload,
    ) -> BoxFuture<'a, Result<String, CollaboratorError>>;

    fn delete<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<(), CollaboratorError>>;
}

/// Opaque key-value persistence for whole session blobs.
pub trait SessionStore: Send + Sync {
    fn save<'a>(
        &'a self,
        profile_id: &'a str,
        name: &'a str,
        blob: &'a serde_json::Value,
    ) -> BoxFuture<'a, Result<SavedSession, CollaboratorError>>;

    fn load<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<serde_json::Value, CollaboratorError>>;

    fn update<'a>(
        &'a self,
        id: &'a str,
        name: &'a str,
        blob: &'a serde_json::Value,
    ) -> BoxFuture<'a, Result<(), CollaboratorError>>;

    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<(), CollaboratorError>>;

    fn list<'a>(
        &'a self,
        profile_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<SavedSession>, CollaboratorError>>;
}
