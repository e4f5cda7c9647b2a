//! Terminal stand-in for the button deck.
//!
//! Input is one command per stdin line:
//!
//! ```text
//! 4        press and release cell 4
//! p 4      press only
//! r 4      release only
//! q        quit
//! ```
//!
//! The renderer redraws the whole 4x8 grid on every flush.

use std::io::{self, BufRead, Write};
use std::thread::{self, JoinHandle};

use axis::{CellFace, Color, DeckRenderer, GRID_COLUMNS, GRID_SIZE};
use owo_colors::{OwoColorize, Style};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::runtime::DeckEvent;

const CELL_WIDTH: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleInputError {
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    #[error("not a cell index: {0:?}")]
    BadIndex(String),

    #[error("cell {0} is outside the {size}-cell grid", size = GRID_SIZE)]
    OutOfRange(usize),
}

/// Parse one input line into deck events. Blank lines yield nothing.
pub fn parse_line(line: &str) -> Result<Vec<DeckEvent>, ConsoleInputError> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Ok(Vec::new());
    };

    let (presses, releases, index_word) = match first.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => return Ok(vec![DeckEvent::Quit]),
        "p" | "press" => (true, false, words.next()),
        "r" | "release" => (false, true, words.next()),
        _ => (true, true, Some(first)),
    };

    if words.next().is_some() {
        return Err(ConsoleInputError::UnknownCommand(line.trim().to_string()));
    }
    let index_word = index_word.ok_or_else(|| ConsoleInputError::UnknownCommand(line.trim().to_string()))?;
    let index = parse_index(index_word)?;

    let mut events = Vec::with_capacity(2);
    if presses {
        events.push(DeckEvent::Key { index, pressed: true });
    }
    if releases {
        events.push(DeckEvent::Key { index, pressed: false });
    }
    Ok(events)
}

fn parse_index(word: &str) -> Result<usize, ConsoleInputError> {
    let index: usize = word
        .parse()
        .map_err(|_| ConsoleInputError::BadIndex(word.to_string()))?;
    if index >= GRID_SIZE {
        return Err(ConsoleInputError::OutOfRange(index));
    }
    Ok(index)
}

/// Read stdin on a dedicated thread and forward parsed events.
///
/// The thread exits on EOF, on `quit`, or once the receiver is dropped.
/// Dropping the sender on exit closes the channel for the consumer.
pub fn spawn_stdin_reader(events: UnboundedSender<DeckEvent>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("console-input".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("stdin read failed: {}", e);
                        break;
                    }
                };
                match parse_line(&line) {
                    Ok(parsed) => {
                        for event in parsed {
                            let quit = event == DeckEvent::Quit;
                            if events.send(event).is_err() || quit {
                                return;
                            }
                        }
                    }
                    Err(e) => warn!("ignoring input: {}", e),
                }
            }
            debug!("stdin closed");
        })
}

fn blank_face() -> CellFace {
    CellFace {
        color: Color::Black,
        pressed: false,
        title: None,
        subtitle: None,
    }
}

/// Prints the deck as a grid of colored cells.
pub struct ConsoleRenderer<W: Write> {
    out: W,
    faces: Vec<CellFace>,
    color: bool,
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            faces: vec![blank_face(); GRID_SIZE],
            color,
        }
    }

    pub fn faces(&self) -> &[CellFace] {
        &self.faces
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn style_for(&self, face: &CellFace) -> Style {
        let style = match face.color {
            Color::Red => Style::new().white().on_red(),
            Color::Black => Style::new().white().on_black(),
            Color::Blue => Style::new().white().on_blue(),
            Color::DarkOrange => Style::new().black().on_truecolor(255, 140, 0),
            Color::Green => Style::new().black().on_green(),
            Color::Purple => Style::new().white().on_truecolor(128, 0, 128),
        };
        if face.pressed {
            style.bold().reversed()
        } else {
            style
        }
    }

    fn cell_text(&self, text: &str, pressed: bool) -> String {
        let (open, close) = if pressed && !self.color {
            ('[', ']')
        } else {
            (' ', ' ')
        };
        let inner: String = text.chars().take(CELL_WIDTH - 2).collect();
        format!("{open}{inner:^width$}{close}", width = CELL_WIDTH - 2)
    }

    fn draw(&mut self) -> io::Result<()> {
        let mut frame = String::new();
        for (row, faces) in self.faces.chunks(GRID_COLUMNS).enumerate() {
            // index, title, subtitle
            for line in 0..3 {
                for (column, face) in faces.iter().enumerate() {
                    let raw = match line {
                        0 => (row * GRID_COLUMNS + column).to_string(),
                        1 => single_line(face.title.as_deref()),
                        _ => single_line(face.subtitle.as_deref()),
                    };
                    let text = self.cell_text(&raw, face.pressed);
                    if self.color {
                        frame.push_str(&format!("{}", text.style(self.style_for(face))));
                    } else {
                        frame.push_str(&text);
                    }
                    frame.push(' ');
                }
                frame.push('\n');
            }
            frame.push('\n');
        }

        self.out.write_all(frame.as_bytes())?;
        self.out.flush()
    }
}

fn single_line(text: Option<&str>) -> String {
    text.unwrap_or("").replace('\n', " ")
}

impl<W: Write> DeckRenderer for ConsoleRenderer<W> {
    fn render_cell(&mut self, index: usize, face: &CellFace) {
        if let Some(slot) = self.faces.get_mut(index) {
            *slot = face.clone();
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.draw() {
            warn!("console render failed: {}", e);
        }
    }
}
