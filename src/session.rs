//! Application coordinator: the upload screen and the editor.
//!
//! The app is always in exactly one stage. A successful upload moves it from
//! `Uploading` to `Editing`; reset drops the editor and everything in it.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::rc::Rc;

use image::{DynamicImage, GenericImageView};

use crate::compositor::{self, AssetSource, ExportRequest, ExportedImage};
use crate::config::EditorConfig;
use crate::engine::{Action, EditorError, EngineCore};
use crate::upload::{self, UploadError};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no photo loaded")]
    NotEditing,
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Editor(#[from] EditorError),
}

/// Which screen the app is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Uploading,
    Editing,
}

/// An open editor: the decoded photo and the engine editing it.
#[derive(Debug)]
pub struct EditorSession {
    source: Rc<DynamicImage>,
    pub engine: EngineCore,
}

impl EditorSession {
    /// The photo at native resolution.
    #[must_use]
    pub fn source(&self) -> &DynamicImage {
        &self.source
    }

    #[must_use]
    pub fn native_size(&self) -> (u32, u32) {
        self.source.dimensions()
    }

    /// Mark the editor busy and hand out what the compositor needs.
    ///
    /// The returned photo handle outlives any borrow of the session, so the
    /// export can run while input keeps flowing.
    ///
    /// # Errors
    ///
    /// See [`EngineCore::begin_export`].
    pub fn begin_export(&mut self) -> Result<(Rc<DynamicImage>, ExportRequest), EditorError> {
        let request = self.engine.begin_export()?;
        Ok((Rc::clone(&self.source), request))
    }

    pub fn finish_export(&mut self, outcome: &Result<ExportedImage, compositor::ExportError>) -> Vec<Action> {
        self.engine.finish_export(outcome)
    }

    /// Run a whole export against `assets`.
    ///
    /// # Errors
    ///
    /// Returns an [`EditorError`] when the export cannot start. Failures after
    /// that are reported through the returned actions.
    pub async fn export(
        &mut self,
        assets: &dyn AssetSource,
    ) -> Result<(Vec<Action>, Option<ExportedImage>), EditorError> {
        let (source, request) = self.begin_export()?;
        let outcome = compositor::export(&source, &request, assets).await;
        let actions = self.finish_export(&outcome);
        // The engine has already logged and reported a failure.
        let image = match outcome {
            Ok(image) => Some(image),
            Err(_) => None,
        };
        Ok((actions, image))
    }
}

#[derive(Debug)]
enum Stage {
    Uploading,
    Editing(EditorSession),
}

/// Top-level two-stage state machine.
#[derive(Debug)]
pub struct App {
    config: EditorConfig,
    stage: Stage,
}

impl Default for App {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl App {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self { config, stage: Stage::Uploading }
    }

    #[must_use]
    pub fn stage(&self) -> StageKind {
        match self.stage {
            Stage::Uploading => StageKind::Uploading,
            Stage::Editing(_) => StageKind::Editing,
        }
    }

    #[must_use]
    pub fn editor(&self) -> Option<&EditorSession> {
        match &self.stage {
            Stage::Editing(session) => Some(session),
            Stage::Uploading => None,
        }
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditorSession> {
        match &mut self.stage {
            Stage::Editing(session) => Some(session),
            Stage::Uploading => None,
        }
    }

    /// Like [`Self::editor_mut`], for callers that need an error.
    ///
    /// # Errors
    ///
    /// Returns `NotEditing` on the upload screen.
    pub fn require_editor(&mut self) -> Result<&mut EditorSession, SessionError> {
        self.editor_mut().ok_or(SessionError::NotEditing)
    }

    /// Decode an uploaded data URI and open the editor on it.
    ///
    /// # Errors
    ///
    /// Returns `Upload` if the payload cannot be decoded; the app stays on
    /// the upload screen. See [`Self::open_image`] for the busy case.
    pub fn upload_data_uri(
        &mut self,
        raw: &str,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Result<Vec<Action>, SessionError> {
        self.ensure_idle()?;
        let image = upload::load_data_uri(raw)?;
        self.open_image(image, viewport_width, viewport_height)
    }

    /// Open the editor on an already decoded photo, replacing any open one.
    ///
    /// # Errors
    ///
    /// Returns `ExportInProgress` while the open editor is exporting.
    pub fn open_image(
        &mut self,
        image: DynamicImage,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Result<Vec<Action>, SessionError> {
        self.ensure_idle()?;
        let (width, height) = image.dimensions();
        log::info!("editing {width}x{height} photo");
        let mut engine = EngineCore::new(self.config.clone());
        let actions = engine.set_source_dimensions(width, height, viewport_width, viewport_height);
        self.stage = Stage::Editing(EditorSession { source: Rc::new(image), engine });
        Ok(actions)
    }

    /// Return to the upload screen, discarding the photo and all placements.
    ///
    /// # Errors
    ///
    /// Returns `ExportInProgress` while the open editor is exporting.
    pub fn reset(&mut self) -> Result<Vec<Action>, SessionError> {
        self.ensure_idle()?;
        let actions = match &mut self.stage {
            Stage::Editing(session) => session.engine.reset(),
            Stage::Uploading => Vec::new(),
        };
        self.stage = Stage::Uploading;
        log::info!("reset to upload screen");
        Ok(actions)
    }

    /// Whether the open editor has an export in flight.
    #[must_use]
    pub fn is_exporting(&self) -> bool {
        self.editor().is_some_and(|session| session.engine.is_exporting())
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        if self.is_exporting() {
            log::warn!("photo change refused while an export is running");
            return Err(EditorError::ExportInProgress.into());
        }
        Ok(())
    }
}
