//! Cell layouts for the 4x8 button grid.
//!
//! Both layouts are built once per scene. The axis layout is generated from
//! the six role pairs crossed with {Ionian, Aeolian}, then the mode selector
//! and the back cell are appended in the last two columns.

use serde::{Deserialize, Serialize};

use crate::harmony::{Axis, Rank, Role};
use crate::mode::ScaleMode;
use crate::pitch::Pitch;

pub const GRID_COLUMNS: usize = 8;
pub const GRID_ROWS: usize = 4;
pub const GRID_SIZE: usize = GRID_COLUMNS * GRID_ROWS;

/// Cell that returns from the axis scene to root selection.
pub const BACK_CELL: usize = GRID_SIZE - 1;

/// Background color tags. How a tag becomes pixels is up to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Black,
    Blue,
    DarkOrange,
    Green,
    Purple,
}

impl Color {
    fn for_role(role: Role) -> Color {
        match role {
            Role::Tonic => Color::Blue,
            Role::Subdominant => Color::DarkOrange,
            Role::Dominant => Color::Green,
        }
    }
}

/// What a single button means. A cell with no pitch, label, or mode is
/// neutral: filler, or the back button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellDescriptor {
    pub color: Color,
    pub pitch: Option<Pitch>,
    pub label: Option<&'static str>,
    pub mode: Option<ScaleMode>,
}

impl CellDescriptor {
    pub const fn neutral() -> Self {
        Self {
            color: Color::Black,
            pitch: None,
            label: None,
            mode: None,
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.pitch.is_none() && self.label.is_none() && self.mode.is_none()
    }
}

pub fn cell_index(row: usize, column: usize) -> usize {
    debug_assert!(row < GRID_ROWS && column < GRID_COLUMNS);
    row * GRID_COLUMNS + column
}

/// Root buttons walk the circle clockwise around a diamond, so neighbours on
/// the deck are a fifth apart.
const ROOT_DIAMOND: [(usize, usize, Pitch); 12] = [
    (0, 3, Pitch::C),
    (0, 4, Pitch::G),
    (1, 5, Pitch::D),
    (1, 6, Pitch::A),
    (2, 6, Pitch::E),
    (2, 5, Pitch::B),
    (3, 4, Pitch::Fs),
    (3, 3, Pitch::Db),
    (2, 2, Pitch::Ab),
    (2, 1, Pitch::Eb),
    (1, 1, Pitch::Bb),
    (1, 2, Pitch::F),
];

const ROOT_PROMPT: [(usize, usize, &str); 2] = [(1, 3, "Set\nyour"), (1, 4, "root\nnote")];

/// One row per (rank, substitute?) combination, top to bottom.
const AXIS_ROWS: [(Rank, bool, &str); GRID_ROWS] = [
    (Rank::Primary, false, "Primary"),
    (Rank::Primary, true, "Prim TSub"),
    (Rank::Secondary, false, "Secondary"),
    (Rank::Secondary, true, "Scnd TSub"),
];

const AXIS_QUALITIES: [ScaleMode; 2] = [ScaleMode::Ionian, ScaleMode::Aeolian];

/// Where the seven mode-only buttons go, in mode order.
const MODE_SELECTOR: [usize; 7] = [6, 7, 14, 15, 22, 23, 30];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: [CellDescriptor; GRID_SIZE],
}

impl Grid {
    pub fn root_selection() -> Self {
        let mut cells = [CellDescriptor::neutral(); GRID_SIZE];

        for (row, column, pitch) in ROOT_DIAMOND {
            cells[cell_index(row, column)] = CellDescriptor {
                color: Color::Red,
                pitch: Some(pitch),
                label: None,
                mode: None,
            };
        }

        for (row, column, label) in ROOT_PROMPT {
            cells[cell_index(row, column)] = CellDescriptor {
                label: Some(label),
                ..CellDescriptor::neutral()
            };
        }

        Self { cells }
    }

    pub fn axis_control(axis: &Axis) -> Self {
        let mut cells = [CellDescriptor::neutral(); GRID_SIZE];

        for (row, (rank, substitute, label)) in AXIS_ROWS.into_iter().enumerate() {
            for (r, role) in Role::ALL.into_iter().enumerate() {
                let pair = axis.pair(role, rank);
                let pitch = if substitute { pair.substitute } else { pair.pitch };
                for (q, mode) in AXIS_QUALITIES.into_iter().enumerate() {
                    let column = r * AXIS_QUALITIES.len() + q;
                    cells[cell_index(row, column)] = CellDescriptor {
                        color: Color::for_role(role),
                        pitch: Some(pitch),
                        label: Some(label),
                        mode: Some(mode),
                    };
                }
            }
        }

        for (index, mode) in MODE_SELECTOR.into_iter().zip(ScaleMode::ALL) {
            cells[index] = CellDescriptor {
                color: Color::Purple,
                pitch: None,
                label: None,
                mode: Some(mode),
            };
        }

        cells[BACK_CELL] = CellDescriptor::neutral();

        Self { cells }
    }

    /// # Panics
    ///
    /// If `index` is outside the grid. The grid size is fixed by the deck, so
    /// an out-of-range index is an integration bug.
    pub fn cell_at(&self, index: usize) -> &CellDescriptor {
        assert!(
            index < GRID_SIZE,
            "cell index {index} outside the {GRID_SIZE}-cell grid"
        );
        &self.cells[index]
    }

    pub fn cells(&self) -> &[CellDescriptor; GRID_SIZE] {
        &self.cells
    }
}
