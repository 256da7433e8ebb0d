// State management module
// Conversation state, its stores, the controller driving them, and the view
// model the window renders

pub mod app_state;
pub mod controller;
pub mod history;
pub mod persistence;
pub mod servers;
pub mod view;

pub use app_state::{ChatState, Phase, ReplyDelivery, SendRejected, WELCOME_MESSAGE};
pub use controller::{ChatController, Confirm};
pub use history::{HistoryGroups, HistoryStore};
pub use persistence::{FileStorage, MemoryStorage, Storage, StorageError};
pub use servers::{RegistryError, ServerDraft, ServerRegistry};
pub use view::ChatView;
