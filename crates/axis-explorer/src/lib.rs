//! Runtime pieces of the axis explorer binary: the midir transport, the
//! console deck, and the single-consumer event loop.

pub mod console;
pub mod midi_io;
pub mod runtime;

pub use console::{parse_line, spawn_stdin_reader, ConsoleInputError, ConsoleRenderer};
pub use midi_io::{list_output_ports, LogSink, MidiError, MidiOutputSink, MidiPortInfo};
pub use runtime::{run, DeckEvent, RunSummary};
