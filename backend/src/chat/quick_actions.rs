//! Quick actions shown on the welcome screen
//!
//! Each action either sends a canned prompt right away or asks the user for
//! an identifier first.

/// A quick action card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    /// List every project
    AllProjects,
    /// List every contract
    AllContracts,
    /// Look up a project by id
    ProjectById,
    /// Look up a contract by id
    ContractById,
    /// Ask what the assistant can do
    Help,
}

/// What triggering a quick action leads to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickActionOutcome {
    /// Send this message immediately
    Send(String),
    /// Ask the user for an identifier first
    Prompt(IdPrompt),
}

/// Identifier prompt opened by the "by id" actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPrompt {
    /// Asking for a project id
    Project,
    /// Asking for a contract id
    Contract,
}

impl QuickAction {
    /// All actions in display order
    pub const ALL: [QuickAction; 5] = [
        QuickAction::AllProjects,
        QuickAction::AllContracts,
        QuickAction::ProjectById,
        QuickAction::ContractById,
        QuickAction::Help,
    ];

    /// Card label
    pub fn label(&self) -> &'static str {
        match self {
            QuickAction::AllProjects => "All Projects",
            QuickAction::AllContracts => "All Contracts",
            QuickAction::ProjectById => "Project by ID",
            QuickAction::ContractById => "Contract by ID",
            QuickAction::Help => "Help",
        }
    }

    /// Resolve the action
    pub fn outcome(&self) -> QuickActionOutcome {
        match self {
            QuickAction::AllProjects => QuickActionOutcome::Send("Show me all projects".to_string()),
            QuickAction::AllContracts => {
                QuickActionOutcome::Send("Show me all contracts".to_string())
            }
            QuickAction::ProjectById => QuickActionOutcome::Prompt(IdPrompt::Project),
            QuickAction::ContractById => QuickActionOutcome::Prompt(IdPrompt::Contract),
            QuickAction::Help => QuickActionOutcome::Send("How can you help me?".to_string()),
        }
    }
}

impl IdPrompt {
    /// Prompt window title
    pub fn title(&self) -> &'static str {
        match self {
            IdPrompt::Project => "Enter Project ID",
            IdPrompt::Contract => "Enter Contract ID",
        }
    }

    /// Input placeholder
    pub fn placeholder(&self) -> &'static str {
        match self {
            IdPrompt::Project => "Enter the project ID to search",
            IdPrompt::Contract => "Enter the contract ID to search",
        }
    }

    /// Message to send for the entered value, `None` when it is blank
    pub fn message_for(&self, value: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        Some(match self {
            IdPrompt::Project => format!("Show me project with ID {}", value),
            IdPrompt::Contract => format!("Show me contract with ID {}", value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_actions_send_prompts() {
        assert_eq!(
            QuickAction::AllProjects.outcome(),
            QuickActionOutcome::Send("Show me all projects".to_string())
        );
        assert_eq!(
            QuickAction::Help.outcome(),
            QuickActionOutcome::Send("How can you help me?".to_string())
        );
    }

    #[test]
    fn test_id_actions_open_prompt() {
        assert_eq!(
            QuickAction::ContractById.outcome(),
            QuickActionOutcome::Prompt(IdPrompt::Contract)
        );
    }

    #[test]
    fn test_id_prompt_message() {
        assert_eq!(
            IdPrompt::Project.message_for(" P-17 ").as_deref(),
            Some("Show me project with ID P-17")
        );
        assert_eq!(IdPrompt::Contract.message_for("   "), None);
    }
}
