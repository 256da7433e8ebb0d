//! Local fallback replies
//!
//! Used whenever the chat backend fails to answer. Replies are picked by
//! substring checks on the lowercased input, first match wins.

const GREETING_REPLY: &str = "Hello! How can I assist you today?";

const HELP_REPLY: &str = "I'm here to help! You can ask me about:\n\
- Project information\n\
- Contract details\n\
- General assistance\n\
\n\
Feel free to use the quick actions or type your question.";

const PROJECT_LIST_REPLY: &str = "Here are all the projects:\n\
\n\
1. Project Alpha - Active\n\
2. Project Beta - Completed\n\
3. Project Gamma - In Progress\n\
\n\
Would you like more details about any specific project?";

const PROJECT_REPLY: &str = "I can help you with project-related questions. What specific information do you need about projects?";

const CONTRACT_LIST_REPLY: &str = "Here are all the contracts:\n\
\n\
1. Contract #001 - Active\n\
2. Contract #002 - Pending\n\
3. Contract #003 - Completed\n\
\n\
Need information about a specific contract?";

const CONTRACT_REPLY: &str = "I can assist with contract information. Would you like to see all contracts or search for a specific one?";

/// Produce the local reply for a message the backend could not answer
pub fn fallback_response(user_message: &str) -> String {
    let lower = user_message.to_lowercase();
    let has = |needle: &str| lower.contains(needle);

    let canned = if has("hello") || has("hi") {
        GREETING_REPLY
    } else if has("help") {
        HELP_REPLY
    } else if has("all projects") || has("show projects") {
        PROJECT_LIST_REPLY
    } else if has("project") {
        PROJECT_REPLY
    } else if has("all contracts") || has("show contracts") {
        CONTRACT_LIST_REPLY
    } else if has("contract") {
        CONTRACT_REPLY
    } else {
        return format!(
            "I understand you're asking about \"{}\". While I'm currently in demo mode, I can help you with projects, contracts, and general information. Try using the quick actions or ask me specific questions!",
            user_message
        );
    };

    canned.to_string()
}
