//! Scenes and the state machine that switches between them.
//!
//! ```text
//!                  press pitch cell
//!   RootSelection ------------------> AxisControl(root)
//!        ^                                  |
//!        +------- press back cell ----------+
//! ```
//!
//! The machine is single-threaded. Callers funnel input events into it one at
//! a time; a transition renders every cell of the new scene before
//! `handle_key` returns.

use serde::Serialize;
use tracing::{debug, info};

use crate::grid::{CellDescriptor, Color, Grid, GRID_SIZE};
use crate::harmony::Axis;
use crate::mode::ScaleMode;
use crate::ndlr::{ControlSink, Ndlr, SendError};
use crate::pitch::Pitch;

/// What a renderer needs to draw one button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellFace {
    pub color: Color,
    pub pressed: bool,
    /// Large text; may contain a line break.
    pub title: Option<String>,
    /// Small text under the title.
    pub subtitle: Option<String>,
}

/// Receiver of cell faces. Implementations turn faces into pixels, terminal
/// output, or whatever the deck needs.
pub trait DeckRenderer {
    fn render_cell(&mut self, index: usize, face: &CellFace);

    /// Called once after a batch of `render_cell` calls.
    fn flush(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SceneKind {
    RootSelection,
    AxisControl(Pitch),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Event had no effect beyond redrawing the cell.
    Echoed,
    /// Control changes went out; the scene is unchanged.
    Commanded,
    /// The active scene changed and was fully rendered.
    Transitioned(SceneKind),
}

#[derive(Debug, Clone)]
pub struct RootSelectionScene {
    grid: Grid,
}

impl RootSelectionScene {
    pub fn new() -> Self {
        Self {
            grid: Grid::root_selection(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

impl Default for RootSelectionScene {
    fn default() -> Self {
        Self::new()
    }
}

/// One harmonic session around a root. Built fresh on every root selection.
#[derive(Debug, Clone)]
pub struct AxisControlScene {
    axis: Axis,
    grid: Grid,
}

impl AxisControlScene {
    pub fn new(root: Pitch) -> Self {
        let axis = Axis::new(root);
        Self {
            grid: Grid::axis_control(&axis),
            axis,
        }
    }

    pub fn axis(&self) -> &Axis {
        &self.axis
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

#[derive(Debug, Clone)]
pub enum Scene {
    RootSelection(RootSelectionScene),
    AxisControl(AxisControlScene),
}

/// What pressing a cell asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Nothing,
    SelectRoot(Pitch),
    ReturnToRoot,
    ChangeMode(Pitch, ScaleMode),
    ChangeChord(Pitch, ScaleMode),
}

impl Scene {
    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::RootSelection(_) => SceneKind::RootSelection,
            Scene::AxisControl(scene) => SceneKind::AxisControl(scene.axis.root()),
        }
    }

    pub fn grid(&self) -> &Grid {
        match self {
            Scene::RootSelection(scene) => scene.grid(),
            Scene::AxisControl(scene) => scene.grid(),
        }
    }

    pub fn cell_at(&self, index: usize) -> &CellDescriptor {
        self.grid().cell_at(index)
    }

    pub fn face(&self, index: usize, pressed: bool) -> CellFace {
        let cell = self.cell_at(index);
        let (title, subtitle) = match (self, cell.pitch, cell.mode) {
            (_, Some(pitch), Some(mode)) => (
                Some(format!("{pitch}{}", mode.suffix())),
                cell.label.map(str::to_string),
            ),
            (_, Some(pitch), None) => (Some(pitch.to_string()), None),
            (Scene::AxisControl(scene), None, Some(mode)) => (
                Some(scene.axis.root().to_string()),
                Some(mode.to_string()),
            ),
            (Scene::AxisControl(_), None, None) if cell.is_neutral() => {
                (Some("Root\nNote".to_string()), None)
            }
            _ => (cell.label.map(str::to_string), None),
        };

        CellFace {
            color: cell.color,
            pressed,
            title,
            subtitle,
        }
    }

    fn action_for(&self, index: usize) -> Action {
        let cell = self.cell_at(index);
        match self {
            Scene::RootSelection(_) => match cell.pitch {
                Some(pitch) => Action::SelectRoot(pitch),
                None => Action::Nothing,
            },
            Scene::AxisControl(scene) => match (cell.pitch, cell.mode) {
                _ if cell.is_neutral() => Action::ReturnToRoot,
                (None, Some(mode)) => Action::ChangeMode(scene.axis.root(), mode),
                (Some(pitch), Some(mode)) => Action::ChangeChord(pitch, mode),
                _ => Action::Nothing,
            },
        }
    }
}

/// Owns the active scene, the NDLR link, and the renderer.
pub struct SceneStateMachine<S, R> {
    scene: Scene,
    ndlr: Ndlr<S>,
    renderer: R,
}

impl<S: ControlSink, R: DeckRenderer> SceneStateMachine<S, R> {
    /// Starts in root selection. Nothing is drawn until [`Self::render_all`].
    pub fn new(ndlr: Ndlr<S>, renderer: R) -> Self {
        Self {
            scene: Scene::RootSelection(RootSelectionScene::new()),
            ndlr,
            renderer,
        }
    }

    /// Starts directly in an axis session for `root`.
    pub fn with_root(ndlr: Ndlr<S>, renderer: R, root: Pitch) -> Self {
        Self {
            scene: Scene::AxisControl(AxisControlScene::new(root)),
            ndlr,
            renderer,
        }
    }

    pub fn kind(&self) -> SceneKind {
        self.scene.kind()
    }

    /// Root of the active axis session, if any.
    pub fn root(&self) -> Option<Pitch> {
        match self.scene.kind() {
            SceneKind::AxisControl(root) => Some(root),
            SceneKind::RootSelection => None,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn ndlr(&self) -> &Ndlr<S> {
        &self.ndlr
    }

    pub fn ndlr_mut(&mut self) -> &mut Ndlr<S> {
        &mut self.ndlr
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Draws every cell of the active scene, unpressed, then flushes.
    pub fn render_all(&mut self) {
        for index in 0..GRID_SIZE {
            let face = self.scene.face(index, false);
            self.renderer.render_cell(index, &face);
        }
        self.renderer.flush();
    }

    /// Handles one button event.
    ///
    /// Releases only redraw the cell. Presses may switch scenes or send
    /// control changes; send failures are returned as-is.
    ///
    /// # Panics
    ///
    /// If `index` is outside the grid.
    pub fn handle_key(&mut self, index: usize, pressed: bool) -> Result<KeyOutcome, SendError> {
        let action = if pressed {
            self.scene.action_for(index)
        } else {
            // Still bounds-checks the index.
            self.scene.cell_at(index);
            Action::Nothing
        };

        match action {
            Action::SelectRoot(root) => {
                return Ok(self.transition(Scene::AxisControl(AxisControlScene::new(root))));
            }
            Action::ReturnToRoot => {
                return Ok(self.transition(Scene::RootSelection(RootSelectionScene::new())));
            }
            _ => {}
        }

        let face = self.scene.face(index, pressed);
        self.renderer.render_cell(index, &face);
        self.renderer.flush();

        match action {
            Action::ChangeMode(root, mode) => {
                self.ndlr.set_key(root)?;
                self.ndlr.set_mode(mode)?;
                Ok(KeyOutcome::Commanded)
            }
            Action::ChangeChord(pitch, mode) => {
                self.ndlr.set_key(pitch)?;
                self.ndlr.set_mode(mode)?;
                self.ndlr.set_chord_degree(1)?;
                Ok(KeyOutcome::Commanded)
            }
            _ => {
                debug!(index, pressed, "key event with no action");
                Ok(KeyOutcome::Echoed)
            }
        }
    }

    fn transition(&mut self, next: Scene) -> KeyOutcome {
        let kind = next.kind();
        info!(from = ?self.scene.kind(), to = ?kind, "scene transition");
        self.scene = next;
        self.render_all();
        KeyOutcome::Transitioned(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::BACK_CELL;
    use crate::ndlr::RecordingSink;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Frames {
        cells: Vec<(usize, CellFace)>,
        flushes: usize,
    }

    impl DeckRenderer for Frames {
        fn render_cell(&mut self, index: usize, face: &CellFace) {
            self.cells.push((index, face.clone()));
        }

        fn flush(&mut self) {
            self.flushes += 1;
        }
    }

    fn machine() -> SceneStateMachine<RecordingSink, Frames> {
        SceneStateMachine::new(Ndlr::new(RecordingSink::new(), 1), Frames::default())
    }

    #[test]
    fn test_starts_in_root_selection_without_drawing() {
        let m = machine();
        assert_eq!(m.kind(), SceneKind::RootSelection);
        assert!(m.renderer().cells.is_empty());
    }

    #[test]
    fn test_root_selection_faces() {
        let m = machine();
        let c = m.scene().face(3, false);
        assert_eq!(c.title.as_deref(), Some("C"));
        assert_eq!(c.color, Color::Red);
        assert_eq!(m.scene().face(11, false).title.as_deref(), Some("Set\nyour"));
        assert_eq!(m.scene().face(0, false).title, None);
    }

    #[test]
    fn test_axis_faces() {
        let m = SceneStateMachine::with_root(Ndlr::new(RecordingSink::new(), 1), Frames::default(), Pitch::C);
        let minor = m.scene().face(1, true);
        assert_eq!(minor.title.as_deref(), Some("Cm"));
        assert_eq!(minor.subtitle.as_deref(), Some("Primary"));
        assert!(minor.pressed);

        let mode_only = m.scene().face(7, false);
        assert_eq!(mode_only.title.as_deref(), Some("C"));
        assert_eq!(mode_only.subtitle.as_deref(), Some("Dorian"));

        let back = m.scene().face(BACK_CELL, false);
        assert_eq!(back.title.as_deref(), Some("Root\nNote"));
        assert_eq!(back.color, Color::Black);
    }

    #[test]
    fn test_release_only_echoes() {
        let mut m = machine();
        let outcome = m.handle_key(3, false).unwrap();
        assert_eq!(outcome, KeyOutcome::Echoed);
        assert_eq!(m.kind(), SceneKind::RootSelection);
        assert_eq!(m.renderer().cells.len(), 1);
        assert!(!m.renderer().cells[0].1.pressed);
    }

    #[test]
    fn test_filler_press_in_root_selection_is_noop() {
        let mut m = machine();
        assert_eq!(m.handle_key(0, true).unwrap(), KeyOutcome::Echoed);
        assert_eq!(m.handle_key(11, true).unwrap(), KeyOutcome::Echoed);
        assert_eq!(m.kind(), SceneKind::RootSelection);
        assert!(m.ndlr().sink().messages.is_empty());
    }

    #[test]
    fn test_axis_release_sends_nothing() {
        let mut m = SceneStateMachine::with_root(Ndlr::new(RecordingSink::new(), 1), Frames::default(), Pitch::C);
        m.handle_key(0, false).unwrap();
        m.handle_key(BACK_CELL, false).unwrap();
        assert!(m.ndlr().sink().messages.is_empty());
        assert_eq!(m.kind(), SceneKind::AxisControl(Pitch::C));
    }

    #[test]
    #[should_panic(expected = "outside the 32-cell grid")]
    fn test_out_of_range_release_panics() {
        machine().handle_key(GRID_SIZE, false).ok();
    }
}
