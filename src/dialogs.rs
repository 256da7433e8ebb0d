// Native dialogs
// Yes/no confirmation before destructive actions and the export save dialog

use std::path::{Path, PathBuf};

use chat_desk_backend::services::export::{write_transcript, write_transcript_to, ExportError};
use chat_desk_backend::services::Transcript;
use chat_desk_backend::state::Confirm;
use tracing::warn;

/// Confirmation backed by a native message box
pub struct NativeConfirm;

impl Confirm for NativeConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        let answer = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title("Chat Desk")
            .set_description(prompt)
            .set_buttons(rfd::MessageButtons::YesNo)
            .show();
        answer == rfd::MessageDialogResult::Yes
    }
}

/// Ask where to save `transcript` and write it there
///
/// Returns `Ok(None)` when the user cancels. If the chosen location cannot
/// be written, the file goes to `fallback_dir` instead.
pub fn save_transcript(
    transcript: &Transcript,
    fallback_dir: &Path,
) -> Result<Option<PathBuf>, ExportError> {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export Chat")
        .set_file_name(transcript.file_name.as_str())
        .add_filter("Text", &["txt"])
        .save_file()
    else {
        return Ok(None);
    };

    match write_transcript_to(&path, transcript) {
        Ok(()) => Ok(Some(path)),
        Err(e) => {
            warn!(error = %e, "Export location not writable; using exports folder");
            write_transcript(fallback_dir, transcript).map(Some)
        }
    }
}

/// Tell the user something went wrong
pub fn show_error(message: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Chat Desk")
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

/// Short notice with an OK button
pub fn show_info(message: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Info)
        .set_title("Chat Desk")
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}
