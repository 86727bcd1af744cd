//! User resolution and content search over a [`ChatRoom`].

use crate::models::{normalize_label, User};
use crate::room::ChatRoom;

impl ChatRoom {
    /// Resolve a user leniently: input and stored labels are both trimmed
    /// and lowercased before comparison.  When several stored users
    /// normalize to the same label, the earliest added wins.
    pub fn find_user(&self, label: &str) -> Option<&User> {
        let wanted = normalize_label(label);
        self.users().iter().find(|user| user.normalized() == wanted)
    }

    /// Resolve a user by exact label.
    pub fn find_user_exact(&self, label: &str) -> Option<&User> {
        self.users().iter().find(|user| user.label() == label)
    }

    /// Index of the first message whose content contains `keyword`.
    ///
    /// Matching is case-sensitive and the keyword is used verbatim.  This is
    /// a linear scan; no index is kept.  The returned position refers to the
    /// sequence as it is now and is invalidated by a later sort or undo.
    pub fn search(&self, keyword: &str) -> Option<usize> {
        self.messages()
            .iter()
            .position(|msg| msg.content().contains(keyword))
    }
}
