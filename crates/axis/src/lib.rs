//! Axis explorer core: harmony model, grid layouts, and the scene state
//! machine that turns button presses into NDLR control changes.
//!
//! The crate knows nothing about the physical deck or the MIDI port. Input
//! arrives as `(cell_index, pressed)` pairs, output leaves through two
//! collaborator traits:
//!
//! - [`DeckRenderer`] receives a [`CellFace`] per button to draw
//! - [`ControlSink`] receives `(channel, controller, value)` control changes
//!
//! # Usage
//!
//! ```rust
//! use axis::{Ndlr, Pitch, RecordingSink, SceneKind, SceneStateMachine, CellFace, DeckRenderer};
//!
//! struct Nowhere;
//! impl DeckRenderer for Nowhere {
//!     fn render_cell(&mut self, _index: usize, _face: &CellFace) {}
//! }
//!
//! let mut machine = SceneStateMachine::new(Ndlr::new(RecordingSink::new(), 1), Nowhere);
//! machine.render_all();
//!
//! // Cell 4 is G on the root selection diamond.
//! machine.handle_key(4, true).unwrap();
//! assert_eq!(machine.kind(), SceneKind::AxisControl(Pitch::G));
//! ```

pub mod grid;
pub mod harmony;
pub mod mode;
pub mod ndlr;
pub mod pitch;
pub mod scene;

pub use grid::{CellDescriptor, Color, Grid, BACK_CELL, GRID_COLUMNS, GRID_ROWS, GRID_SIZE};
pub use harmony::{Axis, Rank, Role, RolePair};
pub use mode::ScaleMode;
pub use ndlr::{
    ControlChange, ControlSink, Controllers, Ndlr, RecordingSink, SendError, CHORD_DEGREE_CC,
    KEY_CC, MODE_CC,
};
pub use pitch::{tritone_sub, CircleOfFifths, ParsePitchError, Pitch};
pub use scene::{
    AxisControlScene, CellFace, DeckRenderer, KeyOutcome, RootSelectionScene, Scene, SceneKind,
    SceneStateMachine,
};
