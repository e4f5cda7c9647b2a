//! Translation of key/mode/chord-degree selections into NDLR control changes.
//!
//! The NDLR listens on a single MIDI channel and takes one CC per parameter.
//! The translator keeps no state beyond the channel and controller numbers,
//! so every call produces exactly one message and repeats are re-sent.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::mode::ScaleMode;
use crate::pitch::Pitch;

/// NDLR key select.
pub const KEY_CC: u8 = 73;
/// NDLR mode select.
pub const MODE_CC: u8 = 74;
/// NDLR chord degree.
pub const CHORD_DEGREE_CC: u8 = 26;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("MIDI output is closed")]
    Closed,

    #[error("MIDI send failed: {0}")]
    Failed(String),
}

/// A single control change as it goes out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlChange {
    /// Zero-based MIDI channel (0-15)
    pub channel: u8,
    pub controller: u8,
    pub value: u8,
}

/// Anything that can put a control change on the wire.
pub trait ControlSink {
    fn send_control_change(&mut self, channel: u8, controller: u8, value: u8)
        -> Result<(), SendError>;
}

impl<T: ControlSink + ?Sized> ControlSink for Box<T> {
    fn send_control_change(
        &mut self,
        channel: u8,
        controller: u8,
        value: u8,
    ) -> Result<(), SendError> {
        (**self).send_control_change(channel, controller, value)
    }
}

/// Sink that keeps every message in memory. Closing it makes later sends fail
/// the way a vanished MIDI port would.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub messages: Vec<ControlChange>,
    closed: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Returns the recorded messages and clears the log.
    pub fn take(&mut self) -> Vec<ControlChange> {
        std::mem::take(&mut self.messages)
    }
}

impl ControlSink for RecordingSink {
    fn send_control_change(
        &mut self,
        channel: u8,
        controller: u8,
        value: u8,
    ) -> Result<(), SendError> {
        if self.closed {
            return Err(SendError::Closed);
        }
        self.messages.push(ControlChange {
            channel,
            controller,
            value,
        });
        Ok(())
    }
}

/// Controller numbers used for each NDLR parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controllers {
    pub key: u8,
    pub mode: u8,
    pub chord_degree: u8,
}

impl Default for Controllers {
    fn default() -> Self {
        Self {
            key: KEY_CC,
            mode: MODE_CC,
            chord_degree: CHORD_DEGREE_CC,
        }
    }
}

/// Zero-based channel for a user-facing channel number (1-16, wrapping).
pub fn channel_index(midi_channel: i32) -> u8 {
    (midi_channel as i64 - 1).rem_euclid(16) as u8
}

/// Fold any integer onto scale degrees 1..=7.
pub fn normalize_chord_degree(degree: i32) -> u8 {
    ((degree as i64 - 1).rem_euclid(7) + 1) as u8
}

#[derive(Debug)]
pub struct Ndlr<S> {
    sink: S,
    channel: u8,
    controllers: Controllers,
}

impl<S: ControlSink> Ndlr<S> {
    pub fn new(sink: S, midi_channel: i32) -> Self {
        Self::with_controllers(sink, midi_channel, Controllers::default())
    }

    pub fn with_controllers(sink: S, midi_channel: i32, controllers: Controllers) -> Self {
        Self {
            sink,
            channel: channel_index(midi_channel),
            controllers,
        }
    }

    /// Zero-based channel messages go out on.
    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn controllers(&self) -> Controllers {
        self.controllers
    }

    pub fn set_key(&mut self, pitch: Pitch) -> Result<(), SendError> {
        debug!(%pitch, "ndlr set key");
        self.send(self.controllers.key, pitch.code())
    }

    pub fn set_mode(&mut self, mode: ScaleMode) -> Result<(), SendError> {
        debug!(%mode, "ndlr set mode");
        self.send(self.controllers.mode, mode.code())
    }

    pub fn set_chord_degree(&mut self, degree: i32) -> Result<(), SendError> {
        let degree = normalize_chord_degree(degree);
        debug!(degree, "ndlr set chord degree");
        self.send(self.controllers.chord_degree, degree)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn send(&mut self, controller: u8, value: u8) -> Result<(), SendError> {
        self.sink
            .send_control_change(self.channel, controller, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cc(channel: u8, controller: u8, value: u8) -> ControlChange {
        ControlChange {
            channel,
            controller,
            value,
        }
    }

    #[test]
    fn test_channel_is_zero_based_and_wraps() {
        assert_eq!(channel_index(1), 0);
        assert_eq!(channel_index(16), 15);
        assert_eq!(channel_index(17), 0);
        assert_eq!(channel_index(0), 15);
        assert_eq!(channel_index(-1), 14);
    }

    #[test]
    fn test_chord_degree_normalization() {
        assert_eq!(normalize_chord_degree(0), 7);
        assert_eq!(normalize_chord_degree(1), 1);
        assert_eq!(normalize_chord_degree(7), 7);
        assert_eq!(normalize_chord_degree(8), 1);
        assert_eq!(normalize_chord_degree(-1), 6);
        assert_eq!(normalize_chord_degree(i32::MIN), normalize_chord_degree(i32::MIN % 7 + 7));
    }

    #[test]
    fn test_messages_carry_codes() {
        let mut ndlr = Ndlr::new(RecordingSink::new(), 3);
        ndlr.set_key(Pitch::Bb).unwrap();
        ndlr.set_mode(ScaleMode::Dorian).unwrap();
        ndlr.set_chord_degree(9).unwrap();

        assert_eq!(
            ndlr.sink().messages,
            vec![cc(2, KEY_CC, 11), cc(2, MODE_CC, 2), cc(2, CHORD_DEGREE_CC, 2)]
        );
    }

    #[test]
    fn test_repeated_calls_resend() {
        let mut ndlr = Ndlr::new(RecordingSink::new(), 1);
        ndlr.set_key(Pitch::C).unwrap();
        ndlr.set_key(Pitch::C).unwrap();
        assert_eq!(ndlr.sink().messages.len(), 2);
    }

    #[test]
    fn test_custom_chord_degree_controller() {
        let controllers = Controllers {
            chord_degree: 27,
            ..Controllers::default()
        };
        let mut ndlr = Ndlr::with_controllers(RecordingSink::new(), 1, controllers);
        ndlr.set_chord_degree(1).unwrap();
        assert_eq!(ndlr.sink().messages, vec![cc(0, 27, 1)]);
    }

    #[test]
    fn test_closed_sink_surfaces_error() {
        let mut sink = RecordingSink::new();
        sink.close();
        let mut ndlr = Ndlr::new(sink, 1);
        assert_eq!(ndlr.set_key(Pitch::C), Err(SendError::Closed));
        assert!(ndlr.sink().messages.is_empty());
    }
}
