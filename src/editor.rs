//! Editing session.
//!
//! [`Editor`] is the one owned object presentation code talks to. It wires
//! the [`EditHistory`] to a [`RasterBackend`], holds the loaded
//! [`EditorConfig`], and tracks interaction state that never enters history:
//! the live slider draft, crop mode, and the before/after compare toggle.
//!
//! ## Draft and commit
//!
//! Dragging a slider emits many intermediate values. Under the default
//! [`CommitPolicy::GestureEnd`] those values update a *draft* that
//! [`Editor::state`] and [`Editor::describe`] reflect immediately, and
//! [`Editor::finish_gesture`] commits the draft as a single undo step.
//! [`CommitPolicy::EveryChange`] commits each value instead.
//!
//! Discrete actions (preset, rotate, flip, crop, reset, undo, redo) finish a
//! pending gesture first, so the drag stays its own step.

use crate::config::{CommitPolicy, EditorConfig};
use crate::error::{EditError, EditResult};
use crate::history::EditHistory;
use crate::imaging::{
    self, CompressionResult, CropRect, Dimensions, DisplaySize, ExportArtifact, ImageHandle,
    RasterBackend,
};
use crate::render::{self, VisualDescription};
use crate::shortcuts::{EditorCommand, KeyPress, command_for};
use crate::state::{Adjustment, AdjustmentState};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum CropMode {
    #[default]
    Idle,
    Selecting(Option<CropRect>),
}

pub struct Editor<B: RasterBackend> {
    backend: B,
    config: EditorConfig,
    history: EditHistory,
    draft: Option<AdjustmentState>,
    crop: CropMode,
    comparing: bool,
}

impl<B: RasterBackend> Editor<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, EditorConfig::default())
    }

    pub fn with_config(backend: B, config: EditorConfig) -> Self {
        Self {
            history: EditHistory::with_limit(config.history.limit),
            backend,
            config,
            draft: None,
            crop: CropMode::Idle,
            comparing: false,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // =========================================================================
    // Upload
    // =========================================================================

    /// Start a new session on an already decoded image.
    pub fn upload(&mut self, image: ImageHandle) {
        self.draft = None;
        self.crop = CropMode::Idle;
        self.comparing = false;
        self.history.upload(image);
    }

    /// Decode `bytes` and start a new session on the result.
    ///
    /// On a decode failure the current session is left untouched.
    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn upload_bytes(&mut self, bytes: &[u8]) -> EditResult<Dimensions> {
        let image = self.backend.decode(bytes)?;
        let dims = image.dimensions();
        self.upload(image);
        tracing::info!(width = dims.width, height = dims.height, "image uploaded");
        Ok(dims)
    }

    // =========================================================================
    // Adjustments
    // =========================================================================

    /// Move one slider. The value is clamped into the slider's range.
    pub fn set_adjustment(&mut self, adjustment: Adjustment, value: f64) {
        let next = self.state().with(adjustment, value);
        match self.config.history.commit {
            CommitPolicy::GestureEnd => self.draft = Some(next),
            CommitPolicy::EveryChange => self.history.commit(next, None),
        }
    }

    /// Commit the pending draft as one history entry.
    ///
    /// Returns `false` when there was no draft or it matched the committed
    /// state.
    pub fn finish_gesture(&mut self) -> bool {
        match self.draft.take() {
            Some(draft) if draft != *self.history.state() => {
                self.history.commit(draft, None);
                true
            }
            _ => false,
        }
    }

    /// Throw the pending draft away.
    pub fn cancel_gesture(&mut self) {
        self.draft = None;
    }

    pub fn has_pending_gesture(&self) -> bool {
        self.draft.is_some()
    }

    /// Overlay a named preset onto the current state.
    pub fn apply_preset(&mut self, name: &str) -> EditResult<()> {
        let preset = *self
            .config
            .preset(name)
            .ok_or_else(|| EditError::UnknownPreset(name.to_string()))?;
        self.finish_gesture();
        let next = self.history.state().with_preset(&preset);
        self.history.commit(next, None);
        tracing::debug!(preset = name, "applied preset");
        Ok(())
    }

    pub fn rotate(&mut self, degrees: i32) {
        self.finish_gesture();
        let next = self.history.state().rotated(degrees);
        self.history.commit(next, None);
    }

    pub fn flip_x(&mut self) {
        self.finish_gesture();
        let next = self.history.state().flipped_x();
        self.history.commit(next, None);
    }

    pub fn flip_y(&mut self) {
        self.finish_gesture();
        let next = self.history.state().flipped_y();
        self.history.commit(next, None);
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Back to the original upload with default adjustments, as one undoable step.
    ///
    /// A no-op before the first upload; a pending draft is left alone then.
    pub fn reset(&mut self) -> bool {
        if self.history.original().is_none() {
            return false;
        }
        self.finish_gesture();
        self.history.reset()
    }

    pub fn undo(&mut self) -> bool {
        self.finish_gesture();
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.finish_gesture();
        self.history.redo()
    }

    /// A pending draft counts, since undo would revert it.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.draft.is_some_and(|d| d != *self.history.state())
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_count(&self) -> usize {
        self.history.undo_len()
    }

    pub fn redo_count(&self) -> usize {
        self.history.redo_len()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The state being displayed: the draft if a gesture is in progress.
    pub fn state(&self) -> AdjustmentState {
        self.draft.unwrap_or(*self.history.state())
    }

    pub fn committed_state(&self) -> &AdjustmentState {
        self.history.state()
    }

    pub fn baseline(&self) -> Option<&ImageHandle> {
        self.history.baseline()
    }

    pub fn original(&self) -> Option<&ImageHandle> {
        self.history.original()
    }

    /// Natural size of the current baseline.
    pub fn image_info(&self) -> Option<Dimensions> {
        self.baseline().map(ImageHandle::dimensions)
    }

    /// Visual description of the displayed state.
    pub fn describe(&self) -> VisualDescription {
        render::describe(&self.state(), self.baseline())
    }

    // =========================================================================
    // Crop
    // =========================================================================

    /// Enter crop mode with no selection.
    pub fn start_crop(&mut self) -> EditResult<()> {
        if self.baseline().is_none() {
            return Err(EditError::EmptyImage);
        }
        self.crop = CropMode::Selecting(None);
        Ok(())
    }

    /// Update the selection. Ignored outside crop mode.
    pub fn set_crop_rect(&mut self, rect: CropRect) {
        if let CropMode::Selecting(selection) = &mut self.crop {
            *selection = Some(rect);
        }
    }

    /// Leave crop mode without touching history.
    pub fn cancel_crop(&mut self) {
        self.crop = CropMode::Idle;
    }

    pub fn is_cropping(&self) -> bool {
        matches!(self.crop, CropMode::Selecting(_))
    }

    pub fn crop_rect(&self) -> Option<&CropRect> {
        match &self.crop {
            CropMode::Selecting(rect) => rect.as_ref(),
            CropMode::Idle => None,
        }
    }

    /// Crop the baseline to the selection, measured against the element's
    /// `displayed` size, and commit the result.
    ///
    /// On failure nothing changes and crop mode stays active.
    #[tracing::instrument(skip(self))]
    pub fn apply_crop(&mut self, displayed: DisplaySize) -> EditResult<Dimensions> {
        let cropped = imaging::crop(&self.backend, self.baseline(), self.crop_rect(), displayed)?;
        let dims = cropped.dimensions();

        self.finish_gesture();
        let state = *self.history.state();
        self.history.commit(state, Some(cropped));
        self.crop = CropMode::Idle;
        tracing::info!(width = dims.width, height = dims.height, "crop applied");
        Ok(dims)
    }

    // =========================================================================
    // Compare
    // =========================================================================

    /// Flip the before/after view. Returns the new setting.
    pub fn toggle_compare(&mut self) -> bool {
        self.comparing = !self.comparing;
        self.comparing
    }

    pub fn is_comparing(&self) -> bool {
        self.comparing
    }

    /// Unedited description of the original upload, for the "before" pane.
    pub fn describe_original(&self) -> Option<VisualDescription> {
        self.original()
            .map(|original| VisualDescription::identity(Some(original.dimensions())))
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Rasterize the displayed state over the baseline.
    pub fn render(&self) -> EditResult<ImageHandle> {
        let baseline = self.baseline().ok_or(EditError::EmptyImage)?;
        Ok(self.backend.composite(baseline, &self.describe())?)
    }

    fn rendered(&self) -> EditResult<Option<ImageHandle>> {
        match self.baseline() {
            Some(_) => self.render().map(Some),
            None => Ok(None),
        }
    }

    /// Estimate the savings of a JPEG re-encode of the displayed image.
    #[tracing::instrument(skip(self))]
    pub fn compress(&self) -> EditResult<CompressionResult> {
        let rendered = self.rendered()?;
        imaging::estimate_compression(
            &self.backend,
            rendered.as_ref(),
            self.config.compression.quality(),
            &self.config.export.compressed_filename,
        )
    }

    /// Full-quality PNG of the displayed image.
    #[tracing::instrument(skip(self))]
    pub fn export(&self) -> EditResult<ExportArtifact> {
        let rendered = self.rendered()?;
        imaging::export(&self.backend, rendered.as_ref(), &self.config.export.filename)
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    /// Run the command bound to `press`, if any.
    ///
    /// Returns the artifact when the command was an export.
    pub fn handle_key(&mut self, press: &KeyPress) -> EditResult<Option<ExportArtifact>> {
        match command_for(press, self.is_cropping()) {
            Some(command) => self.dispatch(command),
            None => Ok(None),
        }
    }

    pub fn dispatch(&mut self, command: EditorCommand) -> EditResult<Option<ExportArtifact>> {
        tracing::debug!(?command, "dispatch");
        match command {
            EditorCommand::Undo => {
                self.undo();
            }
            EditorCommand::Redo => {
                self.redo();
            }
            EditorCommand::CancelCrop => self.cancel_crop(),
            EditorCommand::Export => return self.export().map(Some),
        }
        Ok(None)
    }
}
