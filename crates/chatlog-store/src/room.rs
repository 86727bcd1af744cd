//! The record store.
//!
//! [`ChatRoom`] owns the ordered message sequence, the undo stack that mirrors
//! it, and the list of known users.  Lookup, ordering and persistence live in
//! sibling modules as further `impl ChatRoom` blocks.

use tracing::debug;

use crate::models::{Layout, Message, User};

/// In-memory message ledger.
#[derive(Debug, Default)]
pub struct ChatRoom {
    layout: Layout,
    users: Vec<User>,
    messages: Vec<Message>,
    /// Top is always equal to the last element of `messages`, or both are
    /// empty.
    undo_stack: Vec<Message>,
}

impl ChatRoom {
    /// Create an empty room that saves and loads in the given layout.
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Register a user label.
    ///
    /// Returns `None` when the label is blank or a user with exactly this
    /// label already exists.  Labels differing only by case or whitespace are
    /// distinct entries.
    pub fn add_user(&mut self, label: impl Into<String>) -> Option<&User> {
        let label = label.into();
        if label.trim().is_empty() {
            debug!("rejecting blank user label");
            return None;
        }
        if self.find_user_exact(&label).is_some() {
            debug!(label = %label, "user already known");
            return None;
        }
        debug!(label = %label, "adding user");
        self.users.push(User::new(label));
        self.users.last()
    }

    /// Return the user with exactly this label, creating it if needed.
    pub(crate) fn find_or_create_user(&mut self, label: &str) -> User {
        if let Some(user) = self.find_user_exact(label) {
            return user.clone();
        }
        debug!(label = %label, "creating user on demand");
        let user = User::new(label);
        self.users.push(user.clone());
        user
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    // ------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------

    /// Append a message stamped with the current time.
    pub fn add_message(
        &mut self,
        sender: &User,
        receiver: Option<&User>,
        content: impl Into<String>,
    ) -> &Message {
        let message = Message::new(sender.clone(), receiver.cloned(), content);
        self.push_message(message)
    }

    /// Append an already-built message and record it for undo.
    pub fn push_message(&mut self, message: Message) -> &Message {
        debug!(
            sender = %message.sender(),
            created_at = message.created_at(),
            "appending message"
        );
        self.undo_stack.push(message.clone());
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Remove the most recent message.
    ///
    /// Returns the removed message, or `None` if there is nothing to undo.
    /// The tail of the sequence is dropped by position; the undo stack and
    /// the sequence are kept in lockstep so they always agree.
    pub fn undo_last(&mut self) -> Option<Message> {
        self.undo_stack.pop()?;
        let removed = self.messages.pop();
        debug!(remaining = self.messages.len(), "undid last message");
        removed
    }

    pub fn count(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// All messages in their current order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    /// Number of messages that can currently be undone.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Mutable access for the ordering engine.  Callers must call
    /// [`Self::reseed_undo`] afterwards.
    pub(crate) fn messages_mut(&mut self) -> &mut [Message] {
        &mut self.messages
    }

    /// Replace the whole sequence, e.g. after a load.
    pub(crate) fn replace_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.reseed_undo();
    }

    /// Rebuild the undo stack so that it mirrors the current sequence.
    pub(crate) fn reseed_undo(&mut self) {
        self.undo_stack.clone_from(&self.messages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_with(labels: &[&str]) -> ChatRoom {
        let mut room = ChatRoom::new(Layout::Direct);
        for label in labels {
            room.add_user(*label);
        }
        room
    }

    #[test]
    fn test_add_user_rejects_exact_duplicate() {
        let mut room = ChatRoom::new(Layout::Direct);
        assert!(room.add_user("Alice").is_some());
        assert!(room.add_user("Alice").is_none());
        assert_eq!(room.users().len(), 1);
    }

    #[test]
    fn test_add_user_rejects_blank_labels() {
        let mut room = ChatRoom::new(Layout::Direct);
        assert!(room.add_user("").is_none());
        assert!(room.add_user("   ").is_none());
        assert!(room.users().is_empty());
        assert!(room.find_user("").is_none());
    }

    #[test]
    fn test_add_user_keeps_case_variants() {
        let room = room_with(&["Alice", "alice", " Alice"]);
        let labels: Vec<_> = room.users().iter().map(User::label).collect();
        assert_eq!(labels, vec!["Alice", "alice", " Alice"]);
    }

    #[test]
    fn test_add_message_appends_and_tracks_undo() {
        let mut room = room_with(&["Alice", "Bob"]);
        let alice = room.users()[0].clone();
        let bob = room.users()[1].clone();

        room.add_message(&alice, Some(&bob), "hello");
        room.add_message(&bob, Some(&alice), "hi");

        assert_eq!(room.count(), 2);
        assert_eq!(room.undo_depth(), 2);
        assert_eq!(room.messages()[0].content(), "hello");
        assert_eq!(room.messages()[1].receiver(), Some(&alice));
    }

    #[test]
    fn test_undo_on_empty_room() {
        let mut room = ChatRoom::new(Layout::Direct);
        assert!(room.undo_last().is_none());
        assert_eq!(room.count(), 0);
        assert_eq!(room.undo_depth(), 0);
    }

    #[test]
    fn test_undo_is_inverse_of_add() {
        let mut room = room_with(&["Alice"]);
        let alice = room.users()[0].clone();

        for i in 0..5 {
            room.add_message(&alice, None, format!("msg {i}"));
        }
        for i in (0..5).rev() {
            let undone = room.undo_last().expect("something to undo");
            assert_eq!(undone.content(), format!("msg {i}"));
        }

        assert!(room.is_empty());
        assert_eq!(room.undo_depth(), 0);
        assert!(room.undo_last().is_none());
    }

    #[test]
    fn test_find_or_create_user_is_exact() {
        let mut room = room_with(&["Alice"]);
        let existing = room.find_or_create_user("Alice");
        assert_eq!(existing.label(), "Alice");
        assert_eq!(room.users().len(), 1);

        let created = room.find_or_create_user("alice");
        assert_eq!(created.label(), "alice");
        assert_eq!(room.users().len(), 2);
    }
}
