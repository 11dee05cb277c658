//! The notifier's state machine.
//!
//! Backends translate whatever their toolkit delivers into [`TrayEvent`]s and
//! feed them to a [`Notifier`]. The first terminal transition yields an
//! [`Outcome`]; `main` turns that into the process exit status.

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use crate::error::NotifierError;
use crate::menu;
use crate::outcome::Outcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayEvent {
    /// Primary (left) click on the icon.
    Activate,
    /// The host is about to show the context menu at this position. Only
    /// the tray-icon backend sees right-clicks; SNI hosts open the menu
    /// themselves.
    #[cfg_attr(target_os = "linux", allow(dead_code))]
    MenuRequested { x: i32, y: i32 },
    /// The menu closed without a selection. Neither dbusmenu nor tray-icon
    /// report this; a host that popped up its own menu (a GTK status icon)
    /// would send it when the popup is cancelled.
    #[allow(dead_code)]
    MenuDismissed,
    /// Menu entry at this index was chosen.
    Select(usize),
    /// SIGINT/SIGTERM.
    Interrupted,
    /// The backend lost its connection to the host. No backend reports this
    /// yet; a dropped channel is treated the same way.
    #[allow(dead_code)]
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierState {
    Idle,
    MenuOpen,
    Terminated(Outcome),
}

#[derive(Debug)]
pub struct Notifier {
    state: NotifierState,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            state: NotifierState::Idle,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> NotifierState {
        self.state
    }

    /// Applies one event. Returns the outcome once a terminal transition
    /// happens; every later event is ignored.
    pub fn handle(&mut self, event: TrayEvent) -> Result<Option<Outcome>, NotifierError> {
        if let NotifierState::Terminated(outcome) = self.state {
            debug!(?event, %outcome, "event after termination ignored");
            return Ok(None);
        }

        match event {
            TrayEvent::Activate => Ok(Some(self.terminate(Outcome::Accept))),
            TrayEvent::MenuRequested { x, y } => {
                debug!(x, y, "context menu requested");
                self.state = NotifierState::MenuOpen;
                Ok(None)
            }
            TrayEvent::MenuDismissed => {
                debug!("context menu dismissed");
                self.state = NotifierState::Idle;
                Ok(None)
            }
            // SNI hosts draw the menu themselves and never say it opened,
            // so a selection is honoured from Idle as well.
            TrayEvent::Select(index) => match menu::outcome_at(index) {
                Some(outcome) => Ok(Some(self.terminate(outcome))),
                None => {
                    warn!(index, "selection outside the context menu ignored");
                    self.state = NotifierState::Idle;
                    Ok(None)
                }
            },
            TrayEvent::Interrupted => Err(NotifierError::Interrupted),
            TrayEvent::Failed(reason) => Err(NotifierError::EventLoop(reason)),
        }
    }

    /// Drains `events` until a terminal transition.
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    pub async fn run(
        mut self,
        mut events: UnboundedReceiver<TrayEvent>,
    ) -> Result<Outcome, NotifierError> {
        while let Some(event) = events.recv().await {
            if let Some(outcome) = self.handle(event)? {
                return Ok(outcome);
            }
        }
        Err(NotifierError::EventLoop(
            "tray event channel closed".to_string(),
        ))
    }

    fn terminate(&mut self, outcome: Outcome) -> Outcome {
        info!(%outcome, "user made a choice");
        self.state = NotifierState::Terminated(outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    fn outcome_of(events: impl IntoIterator<Item = TrayEvent>) -> Option<Outcome> {
        let mut notifier = Notifier::new();
        for event in events {
            if let Some(outcome) = notifier.handle(event).unwrap() {
                return Some(outcome);
            }
        }
        None
    }

    fn open_menu() -> TrayEvent {
        TrayEvent::MenuRequested { x: 10, y: 20 }
    }

    #[test]
    fn left_click_accepts() {
        assert_eq!(outcome_of([TrayEvent::Activate]), Some(Outcome::Accept));
    }

    #[test]
    fn right_click_then_select_each_entry() {
        assert_eq!(
            outcome_of([open_menu(), TrayEvent::Select(0)]),
            Some(Outcome::Accept)
        );
        assert_eq!(
            outcome_of([open_menu(), TrayEvent::Select(1)]),
            Some(Outcome::Dismiss)
        );
        assert_eq!(
            outcome_of([open_menu(), TrayEvent::Select(2)]),
            Some(Outcome::Quit)
        );
    }

    #[test]
    fn right_click_opens_menu() {
        let mut notifier = Notifier::new();
        assert_eq!(notifier.handle(open_menu()).unwrap(), None);
        assert_eq!(notifier.state(), NotifierState::MenuOpen);
    }

    #[test]
    fn dismissed_menu_returns_to_idle_and_keeps_responding() {
        let mut notifier = Notifier::new();
        notifier.handle(open_menu()).unwrap();
        notifier.handle(TrayEvent::MenuDismissed).unwrap();
        assert_eq!(notifier.state(), NotifierState::Idle);

        notifier.handle(open_menu()).unwrap();
        notifier.handle(TrayEvent::MenuDismissed).unwrap();
        assert_eq!(
            notifier.handle(TrayEvent::Activate).unwrap(),
            Some(Outcome::Accept)
        );
    }

    #[test]
    fn selection_without_open_notification_is_honoured() {
        assert_eq!(outcome_of([TrayEvent::Select(1)]), Some(Outcome::Dismiss));
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut notifier = Notifier::new();
        notifier.handle(open_menu()).unwrap();
        assert_eq!(notifier.handle(TrayEvent::Select(7)).unwrap(), None);
        assert_eq!(notifier.state(), NotifierState::Idle);
    }

    #[test]
    fn terminated_state_is_final() {
        let mut notifier = Notifier::new();
        notifier.handle(TrayEvent::Select(2)).unwrap();
        assert_eq!(notifier.handle(TrayEvent::Activate).unwrap(), None);
        assert_eq!(
            notifier.state(),
            NotifierState::Terminated(Outcome::Quit)
        );
    }

    #[test]
    fn backend_failure_is_an_event_loop_error() {
        let mut notifier = Notifier::new();
        let err = notifier
            .handle(TrayEvent::Failed("bus gone".into()))
            .unwrap_err();
        assert!(matches!(err, NotifierError::EventLoop(ref r) if r == "bus gone"));
    }

    #[tokio::test]
    async fn run_returns_first_outcome() {
        let (tx, rx) = unbounded_channel();
        tx.send(open_menu()).unwrap();
        tx.send(TrayEvent::MenuDismissed).unwrap();
        tx.send(open_menu()).unwrap();
        tx.send(TrayEvent::Select(1)).unwrap();
        tx.send(TrayEvent::Select(2)).unwrap();

        let outcome = Notifier::new().run(rx).await.unwrap();
        assert_eq!(outcome, Outcome::Dismiss);
    }

    #[tokio::test]
    async fn run_reports_interrupt() {
        let (tx, rx) = unbounded_channel();
        tx.send(TrayEvent::Interrupted).unwrap();

        let err = Notifier::new().run(rx).await.unwrap_err();
        assert!(matches!(err, NotifierError::Interrupted));
    }

    #[tokio::test]
    async fn run_fails_when_backend_hangs_up() {
        let (tx, rx) = unbounded_channel();
        tx.send(open_menu()).unwrap();
        drop(tx);

        let err = Notifier::new().run(rx).await.unwrap_err();
        assert!(matches!(err, NotifierError::EventLoop(_)));
    }
}
