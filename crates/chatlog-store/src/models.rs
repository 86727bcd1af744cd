//! Domain model structs held by the [`ChatRoom`](crate::ChatRoom).
//!
//! Both records are immutable once built: fields are private and only
//! exposed through accessors.

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A known user.  The label is the whole identity; it is stored with its
/// original casing and compared exactly, except by
/// [`ChatRoom::find_user`](crate::ChatRoom::find_user).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    label: String,
}

impl User {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Lowercased, trimmed form of the label used for lenient lookups.
    pub fn normalized(&self) -> String {
        normalize_label(&self.label)
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

pub(crate) fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    sender: User,
    /// `None` for rooms using the [`Layout::Broadcast`] format.
    receiver: Option<User>,
    content: String,
    /// Seconds since the Unix epoch.
    created_at: i64,
}

impl Message {
    /// Build a message stamped with the current wall-clock second.
    pub fn new(sender: User, receiver: Option<User>, content: impl Into<String>) -> Self {
        Self::with_timestamp(sender, receiver, content, Utc::now().timestamp())
    }

    /// Build a message with an explicit timestamp (e.g. one read from disk).
    pub fn with_timestamp(
        sender: User,
        receiver: Option<User>,
        content: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            sender,
            receiver,
            content: content.into(),
            created_at,
        }
    }

    pub fn sender(&self) -> &User {
        &self.sender
    }

    pub fn receiver(&self) -> Option<&User> {
        self.receiver.as_ref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Raw epoch-seconds timestamp.
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// The timestamp as a UTC date, or `None` if it is out of chrono's range.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at, 0)
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Which flat-file format a room reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// `Timestamp,Sender,Receiver,Content`
    #[default]
    Direct,
    /// `Timestamp,Sender,Content`
    Broadcast,
}

impl Layout {
    /// Number of comma-separated columns in a row of this layout.
    pub fn columns(self) -> usize {
        match self {
            Layout::Direct => 4,
            Layout::Broadcast => 3,
        }
    }

    pub fn has_receiver(self) -> bool {
        matches!(self, Layout::Direct)
    }
}

impl std::str::FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Layout::Direct),
            "broadcast" => Ok(Layout::Broadcast),
            other => Err(format!("unknown layout: {other}")),
        }
    }
}
