use crate::api::ChangeMode;
use crate::ui::utils::TextInput;

/// What happens when a confirmation is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    ResetSymbol { name: String, mode: ChangeMode },
    ResetAll(ChangeMode),
    /// Load was requested while edits are unsaved; accepting opens the filename prompt.
    LoadOverUnsaved,
    SaveAndExit,
    Quit,
}

impl ConfirmAction {
    pub fn message(&self) -> String {
        match self {
            ConfirmAction::ResetSymbol { name, mode } => {
                let target = match mode {
                    ChangeMode::Session => "session start",
                    ChangeMode::All => "default",
                };
                format!("Reset {} to {} value?", name, target)
            }
            ConfirmAction::ResetAll(_) => "Reset all changes to default values?".to_string(),
            ConfirmAction::LoadOverUnsaved => {
                "You have unsaved changes. Load new configuration anyway?".to_string()
            }
            ConfirmAction::SaveAndExit => "Save configuration and exit?".to_string(),
            ConfirmAction::Quit => {
                "You have unsaved changes. Are you sure you want to leave?".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    SaveAs,
    Load,
}

impl PromptAction {
    pub fn message(&self) -> &'static str {
        match self {
            PromptAction::SaveAs => "Enter filename:",
            PromptAction::Load => "Enter filename to load:",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Confirm {
        message: String,
        action: ConfirmAction,
    },
    Prompt {
        message: String,
        input: TextInput,
        action: PromptAction,
    },
    Help,
}

impl Dialog {
    pub fn confirm(action: ConfirmAction) -> Self {
        Dialog::Confirm {
            message: action.message(),
            action,
        }
    }

    pub fn prompt(action: PromptAction, default: &str) -> Self {
        Dialog::Prompt {
            message: action.message().to_string(),
            input: TextInput::new(default),
            action,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Dialog::Confirm { .. } => " Confirm ",
            Dialog::Prompt { .. } => " Input ",
            Dialog::Help => " Help ",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_messages_name_the_target() {
        let session = ConfirmAction::ResetSymbol {
            name: "SMP".to_string(),
            mode: ChangeMode::Session,
        };
        assert_eq!(session.message(), "Reset SMP to session start value?");

        let all = ConfirmAction::ResetSymbol {
            name: "SMP".to_string(),
            mode: ChangeMode::All,
        };
        assert_eq!(all.message(), "Reset SMP to default value?");
    }

    #[test]
    fn test_prompt_is_prefilled() {
        match Dialog::prompt(PromptAction::Load, ".config") {
            Dialog::Prompt { message, input, .. } => {
                assert_eq!(message, "Enter filename to load:");
                assert_eq!(input.as_str(), ".config");
                assert_eq!(input.cursor(), 7);
            }
            other => panic!("unexpected dialog {:?}", other),
        }
    }
}
