//! The rendering seam between the controller and whatever displays it.

use super::status::UploadStatus;
use super::transcript::Message;

/// Receives every visible change the controller makes.
///
/// Calls arrive in the order the changes happen. Implementations should
/// keep the newest transcript entry in view.
///
/// Every callback runs while the controller holds its state lock. An
/// implementation must not call back into the controller (its accessors
/// included) from inside a callback, or it will deadlock.
pub trait View: Send + Sync {
    /// A message was added to the transcript.
    fn message_appended(&self, message: &Message);

    /// The typing indicator appeared (`true`) or went away (`false`).
    fn typing_changed(&self, visible: bool);

    /// The upload banner changed.
    fn status_changed(&self, status: &UploadStatus);

    /// A follow-up suggestion was offered, or the offer was withdrawn.
    fn followup_changed(&self, followup: Option<&str>);

    /// The question input should be emptied.
    fn input_cleared(&self);

    /// Blocking notice for the user.
    fn alert(&self, text: &str);
}
