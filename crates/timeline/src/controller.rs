//! Async owner of one editing session and its collaborators.
//!
//! Every operation that involves a collaborator awaits it first and only
//! mutates the session after it succeeded, so a failed upload, transcription
//! or save leaves the session exactly as it was and the user can retry.

use std::sync::Arc;

use crate::collaborator::{
    AssetKind, AssetStorage, CollaboratorError, SavedSession, SessionStore, Transcriber, Upload,
};
use crate::error::{Error, Result, check_duration, check_index};
use crate::id::{IdGenerator, UuidIdGen};
use crate::input::TranscriptInput;
use crate::media::{Background, Frame, MediaKind};
use crate::schedule::{RenderConfig, Schedule};
use crate::session::Session;
use crate::transition::TransitionAsset;

fn failed(operation: &'static str, error: CollaboratorError) -> Error {
    tracing::warn!(operation, error = %error, "collaborator_failed");
    Error::Collaborator(error.to_string())
}

pub struct Editor {
    session: Session,
    profile_id: String,
    saved: Option<SavedSession>,
    ids: Box<dyn IdGenerator>,
    assets: Arc<dyn AssetStorage>,
    sessions: Arc<dyn SessionStore>,
    transcriber: Arc<dyn Transcriber>,
}

impl Editor {
    pub fn new(
        profile_id: impl Into<String>,
        assets: Arc<dyn AssetStorage>,
        sessions: Arc<dyn SessionStore>,
        transcriber: Arc<dyn Transcriber>,
    ) -> Self {
        Self {
            session: Session::new(),
            profile_id: profile_id.into(),
            saved: None,
            ids: Box::new(UuidIdGen),
            assets,
            sessions,
            transcriber,
        }
    }

    pub fn with_id_generator(mut self, ids: Box<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Direct access for edits that need no collaborator. Session methods
    /// validate and recompute derived state themselves.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn saved(&self) -> Option<&SavedSession> {
        self.saved.as_ref()
    }

    pub fn schedule(&self, config: &RenderConfig) -> Schedule {
        self.session.resolve(config)
    }

    async fn upload(&self, kind: AssetKind, upload: &Upload) -> Result<String> {
        let url = self
            .assets
            .upload(kind, upload)
            .await
            .map_err(|e| failed("upload", e))?;
        tracing::info!(kind = %kind, url = %url, "asset_uploaded");
        Ok(url)
    }

    async fn delete_asset(&self, url: Option<&str>) -> Result<()> {
        if let Some(url) = url {
            self.assets
                .delete(url)
                .await
                .map_err(|e| failed("delete", e))?;
            tracing::info!(url = %url, "asset_deleted");
        }
        Ok(())
    }

    // ── Narration ───────────────────────────────────────────────────────────

    /// Transcribe the narration audio and replace the caption words.
    /// Returns the number of words kept.
    pub async fn transcribe(&mut self, audio: &[u8], audio_url: Option<String>) -> Result<usize> {
        let response = self
            .transcriber
            .transcribe(audio)
            .await
            .map_err(|e| failed("transcribe", e))?;

        let input = TranscriptInput::from_response(&response).unwrap_or(TranscriptInput {
            words: Vec::new(),
            duration: None,
        });
        let count = input.words.len();
        let narration = self.session.narration();
        let duration = input.duration.or(narration.duration);
        let audio_url = audio_url.or_else(|| narration.url.clone());

        self.session.set_narration(audio_url, duration)?;
        self.session.apply_transcript(input)?;
        tracing::info!(words = count, "transcript_applied");
        Ok(count)
    }

    // ── Frames and backgrounds ──────────────────────────────────────────────

    pub async fn upload_frame(&mut self, upload: Upload) -> Result<usize> {
        let kind = MediaKind::from_mime(&upload.mime);
        let duration = kind.track_duration(upload.duration);
        check_duration(duration)?;

        let url = self.upload(AssetKind::Frame, &upload).await?;
        self.session.frames_mut().append(duration, Frame::new(url, kind))
    }

    /// Swap the media of the frame at `index`. Its template and style stay.
    pub async fn replace_frame(&mut self, index: usize, upload: Upload) -> Result<()> {
        check_index(index, self.session.frames().len())?;
        let kind = MediaKind::from_mime(&upload.mime);
        let duration = kind.track_duration(upload.duration);
        check_duration(duration)?;

        let mut frame = self.session.frames().items()[index].payload.clone();
        let url = match frame.url.as_deref() {
            Some(old) => self
                .assets
                .replace(AssetKind::Frame, old, &upload)
                .await
                .map_err(|e| failed("replace", e))?,
            None => self.upload(AssetKind::Frame, &upload).await?,
        };

        frame.url = Some(url);
        frame.kind = kind;
        self.session.frames_mut().replace(index, duration, frame)?;
        Ok(())
    }

    pub async fn delete_frame(&mut self, index: usize) -> Result<()> {
        check_index(index, self.session.frames().len())?;
        let url = self.session.frames().items()[index].payload.url.clone();
        self.delete_asset(url.as_deref()).await?;
        self.session.frames_mut().remove(index)?;
        Ok(())
    }

    pub async fn upload_background(&mut self, upload: Upload) -> Result<usize> {
        let kind = MediaKind::from_mime(&upload.mime);
        let duration = kind.track_duration(upload.duration);
        check_duration(duration)?;

        let url = self.upload(AssetKind::Background, &upload).await?;
        self.session
            .backgrounds_mut()
            .append(duration, Background::new(url, kind))
    }

    pub async fn delete_background(&mut self, index: usize) -> Result<()> {
        check_index(index, self.session.backgrounds().len())?;
        let url = self.session.backgrounds().items()[index].payload.url.clone();
        self.delete_asset(url.as_deref()).await?;
        self.session.backgrounds_mut().remove(index)?;
        Ok(())
    }

    // ── Music and transitions ───────────────────────────────────────────────

    /// Returns the id of the new track.
    pub async fn upload_music(&mut self, upload: Upload) -> Result<String> {
        let duration = upload.duration.unwrap_or(f64::NAN);
        check_duration(duration)?;

        let url = self.upload(AssetKind::Music, &upload).await?;
        let track = self
            .session
            .add_bgm_track(self.ids.as_mut(), url, upload.file_name.clone(), duration)?;
        Ok(track.id.clone())
    }

    pub async fn remove_music(&mut self, track_id: &str) -> Result<()> {
        let url = self.session.bgm_track_mut(track_id)?.url.clone();
        self.delete_asset(Some(&url)).await?;
        self.session.remove_bgm_track(track_id)?;
        Ok(())
    }

    pub async fn upload_transition(&mut self, upload: Upload) -> Result<usize> {
        let duration = upload.duration.unwrap_or(f64::NAN);
        check_duration(duration)?;

        let url = self.upload(AssetKind::Transition, &upload).await?;
        self.session.transitions_mut().add(TransitionAsset::new(
            url,
            upload.file_name.clone(),
            duration,
        ))
    }

    pub async fn remove_transition(&mut self, index: usize) -> Result<()> {
        let asset = self
            .session
            .transitions()
            .assets()
            .get(index)
            .ok_or(Error::UnknownTransition(index))?;
        let url = asset.url.clone();
        self.delete_asset(url.as_deref()).await?;
        self.session.transitions_mut().remove(index)?;
        Ok(())
    }

    // ── Persistence ─────────────────────────────────────────────────────────

    /// First save creates a record; later saves update the same record.
    pub async fn save(&mut self, name: impl Into<String>) -> Result<SavedSession> {
        let name = name.into();
        let mut snapshot = self.session.clone();
        snapshot.name = name.clone();
        let blob = snapshot.to_value()?;

        let saved = match &self.saved {
            Some(existing) => {
                self.sessions
                    .update(&existing.id, &name, &blob)
                    .await
                    .map_err(|e| failed("update_session", e))?;
                SavedSession {
                    id: existing.id.clone(),
                    name,
                }
            }
            None => self
                .sessions
                .save(&self.profile_id, &name, &blob)
                .await
                .map_err(|e| failed("save_session", e))?,
        };

        tracing::info!(id = %saved.id, name = %saved.name, "session_saved");
        self.session = snapshot;
        self.saved = Some(saved.clone());
        Ok(saved)
    }

    pub async fn load(&mut self, id: &str) -> Result<()> {
        let blob = self
            .sessions
            .load(id)
            .await
            .map_err(|e| failed("load_session", e))?;
        let session = Session::from_value(blob)?;

        tracing::info!(id = %id, "session_loaded");
        self.saved = Some(SavedSession {
            id: id.to_string(),
            name: session.name.clone(),
        });
        self.session = session;
        Ok(())
    }

    pub async fn list_saved(&self) -> Result<Vec<SavedSession>> {
        self.sessions
            .list(&self.profile_id)
            .await
            .map_err(|e| failed("list_sessions", e))
    }

    pub async fn delete_saved(&mut self, id: &str) -> Result<()> {
        self.sessions
            .delete(id)
            .await
            .map_err(|e| failed("delete_session", e))?;
        if self.saved.as_ref().is_some_and(|s| s.id == id) {
            self.saved = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::collaborator::BoxFuture;
    use crate::id::SequentialIdGen;
    use crate::input::{TranscriptionResponse, TranscriptionWord};
    use crate::schedule::{Layer, RenderInstruction};

    #[derive(Default)]
    struct MemoryAssets {
        urls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl AssetStorage for MemoryAssets {
        fn upload<'a>(
            &'a self,
            kind: AssetKind,
            upload: &'a Upload,
        ) -> BoxFuture<'a, std::result::Result<String, CollaboratorError>> {
            Box::pin(async move {
                if self.fail {
                    return Err("disk full".into());
                }
                let url = format!("/{kind}/{}", upload.file_name);
                self.urls.lock().unwrap().push(url.clone());
                Ok(url)
            })
        }

        fn replace<'a>(
            &'a self,
            _kind: AssetKind,
            url: &'a str,
            upload: &'a Upload,
        ) -> BoxFuture<'a, std::result::Result<String, CollaboratorError>> {
            Box::pin(async move {
                let mut urls = self.urls.lock().unwrap();
                urls.retain(|u| u != url);
                let url = format!("{url}?v={}", upload.file_name);
                urls.push(url.clone());
                Ok(url)
            })
        }

        fn delete<'a>(
            &'a self,
            url: &'a str,
        ) -> BoxFuture<'a, std::result::Result<(), CollaboratorError>> {
            Box::pin(async move {
                if self.fail {
                    return Err("permission denied".into());
                }
                self.urls.lock().unwrap().retain(|u| u != url);
                Ok(())
            })
        }
    }

    #[derive(Default)]
    struct MemorySessions {
        blobs: Mutex<HashMap<String, (String, String, serde_json::Value)>>,
    }

    impl SessionStore for MemorySessions {
        fn save<'a>(
            &'a self,
            profile_id: &'a str,
            name: &'a str,
            blob: &'a serde_json::Value,
        ) -> BoxFuture<'a, std::result::Result<SavedSession, CollaboratorError>> {
            Box::pin(async move {
                let mut blobs = self.blobs.lock().unwrap();
                let id = format!("s{}", blobs.len());
                blobs.insert(
                    id.clone(),
                    (profile_id.to_string(), name.to_string(), blob.clone()),
                );
                Ok(SavedSession {
                    id,
                    name: name.to_string(),
                })
            })
        }

        fn load<'a>(
            &'a self,
            id: &'a str,
        ) -> BoxFuture<'a, std::result::Result<serde_json::Value, CollaboratorError>> {
            Box::pin(async move {
                let blobs = self.blobs.lock().unwrap();
                let (_, _, blob) = blobs.get(id).ok_or("session not found")?;
                Ok(blob.clone())
            })
        }

        fn update<'a>(
            &'a self,
            id: &'a str,
            name: &'a str,
            blob: &'a serde_json::Value,
        ) -> BoxFuture<'a, std::result::Result<(), CollaboratorError>> {
            Box::pin(async move {
                let mut blobs = self.blobs.lock().unwrap();
                let entry = blobs.get_mut(id).ok_or("session not found")?;
                entry.1 = name.to_string();
                entry.2 = blob.clone();
                Ok(())
            })
        }

        fn delete<'a>(
            &'a self,
            id: &'a str,
        ) -> BoxFuture<'a, std::result::Result<(), CollaboratorError>> {
            Box::pin(async move {
                self.blobs.lock().unwrap().remove(id);
                Ok(())
            })
        }

        fn list<'a>(
            &'a self,
            profile_id: &'a str,
        ) -> BoxFuture<'a, std::result::Result<Vec<SavedSession>, CollaboratorError>> {
            Box::pin(async move {
                let blobs = self.blobs.lock().unwrap();
                Ok(blobs
                    .iter()
                    .filter(|(_, (profile, _, _))| profile == profile_id)
                    .map(|(id, (_, name, _))| SavedSession {
                        id: id.clone(),
                        name: name.clone(),
                    })
                    .collect())
            })
        }
    }

    struct FixedTranscriber(TranscriptionResponse);

    impl Transcriber for FixedTranscriber {
        fn transcribe<'a>(
            &'a self,
            _audio: &'a [u8],
        ) -> BoxFuture<'a, std::result::Result<TranscriptionResponse, CollaboratorError>> {
            Box::pin(async move { Ok(self.0.clone()) })
        }
    }

    fn editor_with(assets: MemoryAssets) -> (Editor, Arc<MemoryAssets>) {
        let assets = Arc::new(assets);
        let transcriber = FixedTranscriber(TranscriptionResponse {
            text: "the cat sat".into(),
            duration: Some(2.0),
            words: vec![
                TranscriptionWord {
                    word: "the".into(),
                    start: 0.0,
                    end: 0.0,
                },
                TranscriptionWord {
                    word: "cat".into(),
                    start: 0.3,
                    end: 0.5,
                },
                TranscriptionWord {
                    word: "sat".into(),
                    start: 0.6,
                    end: 1.0,
                },
            ],
        });
        let editor = Editor::new(
            "profile-1",
            assets.clone(),
            Arc::new(MemorySessions::default()),
            Arc::new(transcriber),
        )
        .with_id_generator(Box::new(SequentialIdGen::new()));
        (editor, assets)
    }

    fn image(name: &str) -> Upload {
        Upload {
            file_name: name.into(),
            mime: "image/png".into(),
            bytes: vec![1, 2, 3],
            duration: None,
        }
    }

    fn video(name: &str, secs: f64) -> Upload {
        Upload {
            file_name: name.into(),
            mime: "video/mp4".into(),
            bytes: vec![4, 5, 6],
            duration: Some(secs),
        }
    }

    fn spans(editor: &Editor) -> Vec<(f64, f64)> {
        editor
            .session()
            .frames()
            .iter()
            .map(|item| (item.start, item.end))
            .collect()
    }

    #[tokio::test]
    async fn uploads_append_to_the_frame_chain() {
        let (mut editor, _) = editor_with(MemoryAssets::default());
        editor.upload_frame(image("a.png")).await.unwrap();
        editor.upload_frame(video("b.mp4", 6.0)).await.unwrap();
        editor.upload_frame(video("c.mp4", 2.0)).await.unwrap();

        assert_eq!(spans(&editor), vec![(0.0, 4.0), (4.0, 10.0), (10.0, 12.0)]);
        assert_eq!(
            editor.session().frames().get(0).unwrap().payload.url.as_deref(),
            Some("/frame/a.png")
        );
    }

    #[tokio::test]
    async fn failed_upload_leaves_session_unchanged() {
        let (mut editor, _) = editor_with(MemoryAssets {
            fail: true,
            ..MemoryAssets::default()
        });
        let before = editor.session().clone();

        let err = editor.upload_frame(image("a.png")).await.unwrap_err();
        assert!(matches!(err, Error::Collaborator(msg) if msg == "disk full"));
        assert_eq!(editor.session(), &before);
    }

    #[tokio::test]
    async fn replace_keeps_position_and_rechains() {
        let (mut editor, assets) = editor_with(MemoryAssets::default());
        editor.upload_frame(image("a.png")).await.unwrap();
        editor.upload_frame(image("b.png")).await.unwrap();

        editor.replace_frame(0, video("c.mp4", 1.5)).await.unwrap();

        assert_eq!(spans(&editor), vec![(0.0, 1.5), (1.5, 5.5)]);
        let frame = &editor.session().frames().get(0).unwrap().payload;
        assert_eq!(frame.kind, MediaKind::Video);
        assert_eq!(frame.url.as_deref(), Some("/frame/a.png?v=c.mp4"));
        assert_eq!(assets.urls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_removes_asset_and_rechains() {
        let (mut editor, assets) = editor_with(MemoryAssets::default());
        editor.upload_frame(video("a.mp4", 4.0)).await.unwrap();
        editor.upload_frame(video("b.mp4", 6.0)).await.unwrap();
        editor.upload_frame(video("c.mp4", 2.0)).await.unwrap();

        editor.delete_frame(1).await.unwrap();

        assert_eq!(spans(&editor), vec![(0.0, 4.0), (4.0, 6.0)]);
        assert!(!assets.urls.lock().unwrap().contains(&"/frame/b.mp4".to_string()));
        assert!(editor.delete_frame(5).await.is_err());
    }

    #[tokio::test]
    async fn transcription_sets_words_groups_and_narration() {
        let (mut editor, _) = editor_with(MemoryAssets::default());
        let count = editor
            .transcribe(&[0u8; 4], Some("/audio/narration.mp3".into()))
            .await
            .unwrap();

        assert_eq!(count, 3);
        let session = editor.session();
        assert!(session.words()[0].end >= 0.05);
        assert_eq!(session.groups().len(), 1);
        assert_eq!(session.groups()[0].text, "the cat sat");
        assert_eq!(session.narration().duration, Some(2.0));
        assert_eq!(
            session.narration().url.as_deref(),
            Some("/audio/narration.mp3")
        );
    }

    #[tokio::test]
    async fn retranscribing_without_url_keeps_the_narration_audio() {
        let (mut editor, _) = editor_with(MemoryAssets::default());
        editor
            .transcribe(b"x", Some("/audio/voice.mp3".into()))
            .await
            .unwrap();
        editor.transcribe(b"x", None).await.unwrap();

        assert_eq!(
            editor.session().narration().url.as_deref(),
            Some("/audio/voice.mp3")
        );
        let schedule = editor.schedule(&RenderConfig::default());
        let narration = schedule
            .layer(Layer::Audio)
            .filter(|item| matches!(item.instruction, RenderInstruction::Narration { .. }))
            .count();
        assert_eq!(narration, 1);

        editor
            .transcribe(b"x", Some("/audio/retake.mp3".into()))
            .await
            .unwrap();
        assert_eq!(
            editor.session().narration().url.as_deref(),
            Some("/audio/retake.mp3")
        );
    }

    #[tokio::test]
    async fn music_and_transition_uploads_need_a_duration() {
        let (mut editor, _) = editor_with(MemoryAssets::default());

        assert!(matches!(
            editor.upload_music(image("song.mp3")).await,
            Err(Error::InvalidDuration(_))
        ));

        let id = editor.upload_music(video("song.mp3", 30.0)).await.unwrap();
        assert_eq!(id, "0");
        assert_eq!(editor.session().bgm()[0].points[0].end_at, 30.0);

        let index = editor.upload_transition(video("swipe.mp4", 1.0)).await.unwrap();
        assert_eq!(index, 0);
        editor.remove_transition(0).await.unwrap();
        assert!(editor.session().transitions().assets().is_empty());

        editor.remove_music(&id).await.unwrap();
        assert!(editor.session().bgm().is_empty());
    }

    #[tokio::test]
    async fn save_then_update_then_load() {
        let (mut editor, _) = editor_with(MemoryAssets::default());
        editor.upload_frame(image("a.png")).await.unwrap();

        let first = editor.save("draft").await.unwrap();
        editor.upload_frame(image("b.png")).await.unwrap();
        let second = editor.save("draft 2").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(editor.list_saved().await.unwrap(), vec![second.clone()]);

        editor.session_mut().frames_mut().remove(0).unwrap();
        editor.load(&second.id).await.unwrap();

        assert_eq!(editor.session().name, "draft 2");
        assert_eq!(editor.session().frames().len(), 2);

        assert!(editor.load("missing").await.is_err());
        assert_eq!(editor.session().frames().len(), 2);

        editor.delete_saved(&second.id).await.unwrap();
        assert!(editor.saved().is_none());
    }
}
