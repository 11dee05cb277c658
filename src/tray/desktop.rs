use tracing::{debug, info};
use tray_icon::menu::{Menu, MenuEvent, MenuId, MenuItem};
use tray_icon::{Icon, MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent};
use winit::application::ApplicationHandler;
use winit::event::{StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use crate::config::Config;
use crate::error::NotifierError;
use crate::menu::context_menu;
use crate::notifier::{Notifier, TrayEvent};
use crate::outcome::Outcome;

const ICON_SIZE: u32 = 32;

#[derive(Debug)]
enum UserEvent {
    Tray(TrayIconEvent),
    Menu(MenuEvent),
    Interrupted,
}

struct DesktopTray {
    tooltip: String,
    notifier: Notifier,
    tray: Option<TrayIcon>,
    item_ids: Vec<MenuId>,
    result: Option<Result<Outcome, NotifierError>>,
}

impl DesktopTray {
    fn new(config: &Config, notifier: Notifier) -> Self {
        Self {
            tooltip: config.tooltip.clone(),
            notifier,
            tray: None,
            item_ids: Vec::new(),
            result: None,
        }
    }

    // tray-icon needs the event loop running before the icon exists on macOS
    fn build_tray(&mut self) -> Result<(), NotifierError> {
        let menu = Menu::new();
        for entry in context_menu() {
            let item = MenuItem::new(entry.label, true, None);
            menu.append(&item)
                .map_err(|e| NotifierError::TrayUnavailable(e.to_string()))?;
            self.item_ids.push(item.id().clone());
        }

        let tray = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_menu_on_left_click(false)
            .with_tooltip(&self.tooltip)
            .with_icon(placeholder_icon()?)
            .build()
            .map_err(|e| NotifierError::TrayUnavailable(e.to_string()))?;

        info!("tray icon registered");
        self.tray = Some(tray);
        Ok(())
    }

    fn translate(&self, event: UserEvent) -> Option<TrayEvent> {
        match event {
            UserEvent::Tray(TrayIconEvent::Click {
                button,
                button_state: MouseButtonState::Up,
                position,
                ..
            }) => match button {
                MouseButton::Left => Some(TrayEvent::Activate),
                MouseButton::Right => Some(TrayEvent::MenuRequested {
                    x: position.x as i32,
                    y: position.y as i32,
                }),
                _ => None,
            },
            UserEvent::Tray(_) => None,
            UserEvent::Menu(event) => self
                .item_ids
                .iter()
                .position(|id| *id == event.id)
                .map(TrayEvent::Select),
            UserEvent::Interrupted => Some(TrayEvent::Interrupted),
        }
    }

    fn finish(&mut self, event_loop: &ActiveEventLoop, result: Result<Outcome, NotifierError>) {
        self.result = Some(result);
        event_loop.exit();
    }
}

impl ApplicationHandler<UserEvent> for DesktopTray {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, cause: StartCause) {
        if matches!(cause, StartCause::Init) {
            if let Err(e) = self.build_tray() {
                self.finish(event_loop, Err(e));
            }
        }
    }

    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, _event: WindowEvent) {}

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
        debug!(?event, "tray event");
        let Some(event) = self.translate(event) else {
            return;
        };

        match self.notifier.handle(event) {
            Ok(Some(outcome)) => self.finish(event_loop, Ok(outcome)),
            Ok(None) => {}
            Err(e) => self.finish(event_loop, Err(e)),
        }
    }
}

/// Theme icon names do not resolve outside freedesktop hosts, so a plain
/// square stands in for the sboui icon.
fn placeholder_icon() -> Result<Icon, NotifierError> {
    let rgba = [0x3b, 0x6e, 0xa5, 0xff].repeat((ICON_SIZE * ICON_SIZE) as usize);
    Icon::from_rgba(rgba, ICON_SIZE, ICON_SIZE)
        .map_err(|e| NotifierError::TrayUnavailable(e.to_string()))
}

pub fn run(config: &Config, notifier: Notifier) -> Result<Outcome, NotifierError> {
    let event_loop = EventLoop::<UserEvent>::with_user_event()
        .build()
        .map_err(|e| NotifierError::TrayUnavailable(e.to_string()))?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let proxy = event_loop.create_proxy();
    TrayIconEvent::set_event_handler(Some(move |event| {
        let _ = proxy.send_event(UserEvent::Tray(event));
    }));

    let proxy = event_loop.create_proxy();
    MenuEvent::set_event_handler(Some(move |event| {
        let _ = proxy.send_event(UserEvent::Menu(event));
    }));

    let proxy = event_loop.create_proxy();
    super::watch_interrupts(move || {
        let _ = proxy.send_event(UserEvent::Interrupted);
    });

    let mut app = DesktopTray::new(config, notifier);
    event_loop
        .run_app(&mut app)
        .map_err(|e| NotifierError::EventLoop(e.to_string()))?;

    app.result.unwrap_or_else(|| {
        Err(NotifierError::EventLoop(
            "event loop exited without a choice".to_string(),
        ))
    })
}
