//! Context menu shown on right-click.
//!
//! The entries are a fixed list; backends render them with whatever native
//! menu widget they have and report the chosen index back.

use crate::outcome::Outcome;

/// Advisory icon for a menu entry. Backends may substitute the closest
/// equivalent they can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuIcon {
    Run,
    Close,
    Exit,
}

impl MenuIcon {
    /// freedesktop icon-naming-spec name.
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    pub fn theme_name(self) -> &'static str {
        match self {
            MenuIcon::Run => "system-run",
            MenuIcon::Close => "window-close",
            MenuIcon::Exit => "application-exit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: &'static str,
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    pub icon: MenuIcon,
    pub outcome: Outcome,
}

pub const MENU_LEN: usize = 3;

/// Builds the three-entry context menu in display order.
pub fn context_menu() -> [MenuEntry; MENU_LEN] {
    [
        MenuEntry {
            label: "Launch sboui updater",
            icon: MenuIcon::Run,
            outcome: Outcome::Accept,
        },
        MenuEntry {
            label: "Ignore for now",
            icon: MenuIcon::Close,
            outcome: Outcome::Dismiss,
        },
        MenuEntry {
            label: "Don't remind me again",
            icon: MenuIcon::Exit,
            outcome: Outcome::Quit,
        },
    ]
}

/// Outcome of the entry at `index`, if there is one.
pub fn outcome_at(index: usize) -> Option<Outcome> {
    context_menu().get(index).map(|entry| entry.outcome)
}
