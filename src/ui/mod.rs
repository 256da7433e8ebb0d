// UI module
// Layout, reusable components, and the settings window. Rendering never
// mutates the controller directly; it reports what the user did as actions.

pub mod components;
pub mod layout;
pub mod settings;

pub use layout::render_app_layout;
pub use settings::{render_settings_window, SettingsState};

use chat_desk_backend::chat::{Notification, QuickAction, SessionId};

/// Something the user did during a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Send the message input
    Send,
    /// Run a quick action card
    QuickAction(QuickAction),
    /// Submit the identifier prompt
    SubmitPrompt,
    /// Dismiss the identifier prompt
    CancelPrompt,
    /// Clear the active conversation
    ClearChat,
    /// Open a history entry
    LoadChat(SessionId),
    /// Delete a history entry
    DeleteChat(SessionId),
    /// Delete every history entry
    DeleteAllChats,
    /// Show or hide the history sidebar
    ToggleSidebar,
    /// Menu item or shortcut
    Notify(Notification),
    /// Save the server form (add or update)
    SaveServer,
    /// Remove a server
    RemoveServer(String),
    /// Push the server list to the backend
    SyncServers,
    /// Use the endpoint typed in settings
    ApplyEndpoint,
    /// Close the window
    Quit,
}
