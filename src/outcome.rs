use std::fmt;
use std::process::ExitCode;

/// The user's decision, reported to the calling script as the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Launch the updater (menu entry or left-click on the icon).
    Accept,
    /// Ignore the notification for now.
    Dismiss,
    /// Never remind again.
    Quit,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Accept => 0,
            Outcome::Dismiss => 1,
            Outcome::Quit => 2,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Outcome::Accept => "accept",
            Outcome::Dismiss => "dismiss",
            Outcome::Quit => "quit",
        };
        f.write_str(name)
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        ExitCode::from(outcome.exit_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_match_calling_script_contract() {
        assert_eq!(Outcome::Accept.exit_code(), 0);
        assert_eq!(Outcome::Dismiss.exit_code(), 1);
        assert_eq!(Outcome::Quit.exit_code(), 2);
    }

    #[test]
    fn display_is_lowercase_name() {
        assert_eq!(Outcome::Dismiss.to_string(), "dismiss");
    }
}
