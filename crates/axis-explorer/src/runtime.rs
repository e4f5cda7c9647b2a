//! Single-consumer event loop.
//!
//! Input producers (the stdin thread today, a hardware deck callback later)
//! only ever hold an `UnboundedSender<DeckEvent>`. The loop below is the one
//! place that touches the state machine, so key events are handled strictly
//! in arrival order.

use axis::{ControlSink, DeckRenderer, KeyOutcome, SceneStateMachine, SendError};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckEvent {
    Key { index: usize, pressed: bool },
    Quit,
}

/// Counts of what happened during a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub events: u64,
    pub commands: u64,
    pub transitions: u64,
}

/// Render the initial scene, then feed events to the machine until `Quit`
/// arrives or every sender is gone. A failed control change ends the loop.
pub async fn run<S, R>(
    machine: &mut SceneStateMachine<S, R>,
    mut events: UnboundedReceiver<DeckEvent>,
) -> Result<RunSummary, SendError>
where
    S: ControlSink,
    R: DeckRenderer,
{
    let mut summary = RunSummary::default();
    machine.render_all();
    info!(scene = ?machine.kind(), "deck ready");

    while let Some(event) = events.recv().await {
        match event {
            DeckEvent::Quit => {
                debug!("quit requested");
                break;
            }
            DeckEvent::Key { index, pressed } => {
                summary.events += 1;
                match machine.handle_key(index, pressed)? {
                    KeyOutcome::Commanded => summary.commands += 1,
                    KeyOutcome::Transitioned(_) => summary.transitions += 1,
                    KeyOutcome::Echoed => {}
                }
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axis::{CellFace, Ndlr, Pitch, RecordingSink, SceneKind};
    use tokio::sync::mpsc;

    #[derive(Default)]
    struct Flushes(usize);

    impl DeckRenderer for Flushes {
        fn render_cell(&mut self, _index: usize, _face: &CellFace) {}

        fn flush(&mut self) {
            self.0 += 1;
        }
    }

    #[tokio::test]
    async fn test_closed_channel_ends_run() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(tx);
        let mut machine = SceneStateMachine::new(Ndlr::new(RecordingSink::new(), 1), Flushes::default());

        let summary = run(&mut machine, rx).await.unwrap();

        assert_eq!(summary, RunSummary::default());
        // Startup render only
        assert_eq!(machine.renderer().0, 1);
    }

    #[tokio::test]
    async fn test_quit_stops_before_later_events() {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(DeckEvent::Quit).unwrap();
        tx.send(DeckEvent::Key { index: 4, pressed: true }).unwrap();
        let mut machine = SceneStateMachine::new(Ndlr::new(RecordingSink::new(), 1), Flushes::default());

        run(&mut machine, rx).await.unwrap();

        assert_eq!(machine.kind(), SceneKind::RootSelection);
    }

    #[tokio::test]
    async fn test_send_error_propagates() {
        let mut sink = RecordingSink::new();
        sink.close();
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(DeckEvent::Key { index: 0, pressed: true }).unwrap();
        let mut machine = SceneStateMachine::with_root(Ndlr::new(sink, 1), Flushes::default(), Pitch::C);

        let result = run(&mut machine, rx).await;

        assert_eq!(result, Err(SendError::Closed));
    }
}
