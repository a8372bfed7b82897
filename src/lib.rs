//! # Retouch
//!
//! The editing core of an in-browser photo editor: undoable adjustments,
//! crop, rotate and flip, presets, a compression estimate, and PNG export.
//! The display surface (a browser canvas, a native window, a test) only
//! renders what [`editor::Editor`] describes and feeds it input.
//!
//! # Architecture: State In, Description Out
//!
//! ```text
//! input ──► Editor ──► EditHistory::commit ──► AdjustmentState + baseline
//!                                                   │
//!                                                   ▼
//!                            render::describe ──► VisualDescription
//!                                                   │
//!                       RasterBackend::composite ◄──┘ (compress / export)
//! ```
//!
//! Every semantic edit becomes one [`history::EditHistory::commit`]. The
//! rendered image is always a pure function of the current state and the
//! current baseline bitmap, so undo and redo never need to recompute pixels.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`state`] | `AdjustmentState`, slider ranges, presets |
//! | [`history`] | Linear undo/redo over `(state, baseline)` snapshots |
//! | [`editor`] | The session object: draft/commit, crop mode, compare, output |
//! | [`render`] | Pure state → `VisualDescription` (CSS filter chain + transforms) |
//! | [`imaging`] | Crop geometry, compression estimate, export, raster backends |
//! | [`shortcuts`] | Keyboard bindings to editor commands |
//! | [`config`] | `config.toml` loading, validation and merging |
//! | [`output`] | Text formatting for panels and the compression result |
//! | [`error`] | `EditError` |
//!
//! # Design Decisions
//!
//! ## Baselines, Not Pixel Edits
//!
//! Colour adjustments, rotation and flips are never baked into pixels while
//! editing. Only crop produces a new bitmap, which becomes the baseline the
//! remaining parameters are described against. Bitmaps are shared
//! [`imaging::ImageHandle`]s compared by identity, so a history entry costs a
//! few words no matter how large the photo is.
//!
//! ## Draft Then Commit
//!
//! A slider drag is one edit, not fifty. Live values go to a draft that the
//! display reflects immediately; the gesture end commits it. The
//! `history.commit = "every-change"` setting switches to one entry per value.
//!
//! ## Swappable Raster Backend
//!
//! Decode, draw, composite and encode sit behind
//! [`imaging::RasterBackend`]. [`imaging::RustBackend`] does the pixel work
//! with the `image` crate and `rayon`; tests use a recording mock.

pub mod config;
pub mod editor;
pub mod error;
pub mod history;
pub mod imaging;
pub mod output;
pub mod render;
pub mod shortcuts;
pub mod state;

pub use config::EditorConfig;
pub use editor::Editor;
pub use error::{EditError, EditResult};
pub use history::{EditHistory, HistoryEntry};
pub use render::{VisualDescription, describe};
pub use state::{Adjustment, AdjustmentState, Flip, Preset};

#[cfg(test)]
pub(crate) mod test_helpers;
