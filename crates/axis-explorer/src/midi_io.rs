//! MIDI output via ALSA (through midir)
//!
//! The NDLR only needs control changes, so this is output-only.

use axis::{ControlChange, ControlSink, SendError};
use midir::{MidiOutput, MidiOutputConnection};
use tracing::{debug, info};

/// Information about a discovered MIDI port
#[derive(Debug, Clone)]
pub struct MidiPortInfo {
    /// Port index (for midir connection)
    pub index: usize,
    /// Port name from ALSA
    pub name: String,
}

/// Error type for MIDI operations
#[derive(Debug, thiserror::Error)]
pub enum MidiError {
    #[error("Failed to initialize MIDI: {0}")]
    InitFailed(String),

    #[error("Port not found: {0}")]
    PortNotFound(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Send failed: {0}")]
    SendFailed(String),
}

/// Encode a control change as the three wire bytes.
pub fn encode_control_change(cc: &ControlChange) -> [u8; 3] {
    [
        0xB0 | (cc.channel & 0x0F),
        cc.controller & 0x7F,
        cc.value & 0x7F,
    ]
}

/// List available MIDI output ports
pub fn list_output_ports() -> Result<Vec<MidiPortInfo>, MidiError> {
    let midi_out =
        MidiOutput::new("axis-explorer-scan").map_err(|e| MidiError::InitFailed(e.to_string()))?;

    let ports: Vec<MidiPortInfo> = midi_out
        .ports()
        .iter()
        .enumerate()
        .filter_map(|(i, port)| {
            midi_out
                .port_name(port)
                .ok()
                .map(|name| MidiPortInfo { index: i, name })
        })
        .collect();

    Ok(ports)
}

/// Open MIDI output connection feeding the NDLR.
pub struct MidiOutputSink {
    /// Connection (None once closed)
    connection: Option<MidiOutputConnection>,
    /// Port name
    pub port_name: String,
    /// Message counter
    pub messages_sent: u64,
}

impl MidiOutputSink {
    /// Open the first MIDI output port whose name contains `port_pattern`
    pub fn open(port_pattern: &str) -> Result<Self, MidiError> {
        let midi_out =
            MidiOutput::new("axis-explorer").map_err(|e| MidiError::InitFailed(e.to_string()))?;

        let ports = midi_out.ports();
        let port = ports
            .iter()
            .find(|p| {
                midi_out
                    .port_name(p)
                    .map(|n| n.contains(port_pattern))
                    .unwrap_or(false)
            })
            .ok_or_else(|| MidiError::PortNotFound(port_pattern.to_string()))?;

        let port_name = midi_out
            .port_name(port)
            .map_err(|e| MidiError::ConnectionFailed(e.to_string()))?;

        let connection = midi_out
            .connect(port, "axis-explorer-output")
            .map_err(|e| MidiError::ConnectionFailed(e.to_string()))?;

        info!("Opened MIDI output: {}", port_name);

        Ok(Self {
            connection: Some(connection),
            port_name,
            messages_sent: 0,
        })
    }

    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// Send raw MIDI bytes
    pub fn send_raw(&mut self, data: &[u8]) -> Result<(), MidiError> {
        let conn = self
            .connection
            .as_mut()
            .ok_or_else(|| MidiError::SendFailed("Connection closed".to_string()))?;
        conn.send(data)
            .map_err(|e| MidiError::SendFailed(e.to_string()))?;
        self.messages_sent += 1;
        Ok(())
    }

    /// Close the connection
    pub fn close(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.close();
            info!(
                "Closed MIDI output: {} ({} messages sent)",
                self.port_name, self.messages_sent
            );
        }
    }
}

impl ControlSink for MidiOutputSink {
    fn send_control_change(
        &mut self,
        channel: u8,
        controller: u8,
        value: u8,
    ) -> Result<(), SendError> {
        if !self.is_open() {
            return Err(SendError::Closed);
        }
        let bytes = encode_control_change(&ControlChange {
            channel,
            controller,
            value,
        });
        self.send_raw(&bytes)
            .map_err(|e| SendError::Failed(e.to_string()))
    }
}

impl Drop for MidiOutputSink {
    fn drop(&mut self) {
        self.close();
    }
}

/// Sink for `--dry-run`: logs each control change instead of sending it.
#[derive(Debug, Default)]
pub struct LogSink {
    pub messages_sent: u64,
}

impl ControlSink for LogSink {
    fn send_control_change(
        &mut self,
        channel: u8,
        controller: u8,
        value: u8,
    ) -> Result<(), SendError> {
        let bytes = encode_control_change(&ControlChange {
            channel,
            controller,
            value,
        });
        info!(
            channel = u16::from(channel) + 1,
            controller,
            value,
            "dry run: {:02X} {:02X} {:02X}",
            bytes[0],
            bytes[1],
            bytes[2]
        );
        self.messages_sent += 1;
        debug!(total = self.messages_sent, "dry run message count");
        Ok(())
    }
}
