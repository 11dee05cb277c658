use ksni::menu::StandardItem;
use ksni::{MenuItem, ToolTip, Tray, TrayMethods};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::NotifierError;
use crate::menu::context_menu;
use crate::notifier::{Notifier, TrayEvent};
use crate::outcome::Outcome;

/// StatusNotifierItem exported on the session bus. Every host interaction is
/// forwarded to the notifier as a [`TrayEvent`].
pub struct SbouiTray {
    icon_name: String,
    tooltip: String,
    events: UnboundedSender<TrayEvent>,
}

impl SbouiTray {
    pub fn new(config: &Config, events: UnboundedSender<TrayEvent>) -> Self {
        Self {
            icon_name: config.icon_name.clone(),
            tooltip: config.tooltip.clone(),
            events,
        }
    }

    fn send(&self, event: TrayEvent) {
        if self.events.send(event).is_err() {
            debug!("notifier already finished, tray event dropped");
        }
    }
}

impl Tray for SbouiTray {
    fn id(&self) -> String {
        env!("CARGO_PKG_NAME").into()
    }

    fn title(&self) -> String {
        self.tooltip.clone()
    }

    fn icon_name(&self) -> String {
        self.icon_name.clone()
    }

    fn tool_tip(&self) -> ToolTip {
        ToolTip {
            title: self.tooltip.clone(),
            ..Default::default()
        }
    }

    fn activate(&mut self, x: i32, y: i32) {
        debug!(x, y, "tray icon activated");
        self.send(TrayEvent::Activate);
    }

    fn menu(&self) -> Vec<MenuItem<Self>> {
        context_menu()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                StandardItem {
                    label: entry.label.into(),
                    icon_name: entry.icon.theme_name().into(),
                    activate: Box::new(move |tray: &mut Self| tray.send(TrayEvent::Select(index))),
                    ..Default::default()
                }
                .into()
            })
            .collect()
    }
}

pub async fn run(config: &Config, notifier: Notifier) -> Result<Outcome, NotifierError> {
    let (tx, rx) = unbounded_channel();

    let interrupt_tx = tx.clone();
    super::watch_interrupts(move || {
        let _ = interrupt_tx.send(TrayEvent::Interrupted);
    });

    // fails when there is no session bus or no StatusNotifierWatcher
    let _handle = SbouiTray::new(config, tx)
        .spawn()
        .await
        .map_err(|e| NotifierError::TrayUnavailable(e.to_string()))?;
    info!(icon = %config.icon_name, "tray icon registered");

    notifier.run(rx).await
}
