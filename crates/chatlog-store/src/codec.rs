//! Row format of the flat history file.
//!
//! Fields are joined with a bare comma; nothing is quoted or escaped.  When
//! reading, a row is split into at most [`Layout::columns`] fields and the
//! last field takes the rest of the line, so commas survive inside message
//! content but not inside user labels.
//!
//! Rows end at `\n`, so content containing a newline is split into two rows
//! on reload, and a `\r` at the very end of the content is dropped as part of
//! a CRLF line ending.  Blank labels never name a user: an empty or
//! whitespace-only receiver field reads as "no receiver" and a row with a
//! blank sender is rejected.

use std::num::ParseIntError;

use thiserror::Error;

use crate::models::{Layout, Message};

pub const DIRECT_HEADER: &str = "Timestamp,Sender,Receiver,Content";
pub const BROADCAST_HEADER: &str = "Timestamp,Sender,Content";

/// Header row written at the top of every file of this layout.
pub fn header(layout: Layout) -> &'static str {
    match layout {
        Layout::Direct => DIRECT_HEADER,
        Layout::Broadcast => BROADCAST_HEADER,
    }
}

/// Render one message as a row (without trailing newline).
///
/// In the direct layout a message without receiver gets an empty receiver
/// field; in the broadcast layout the receiver is dropped.
pub fn encode_row(message: &Message, layout: Layout) -> String {
    let ts = message.created_at();
    let sender = message.sender().label();
    match layout {
        Layout::Direct => {
            let receiver = message.receiver().map(|u| u.label()).unwrap_or_default();
            format!("{ts},{sender},{receiver},{}", message.content())
        }
        Layout::Broadcast => format!("{ts},{sender},{}", message.content()),
    }
}

/// A parsed row, borrowing from the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    pub created_at: i64,
    pub sender: &'a str,
    /// Always `None` in the broadcast layout, and `None` for a blank
    /// receiver field in the direct layout.
    pub receiver: Option<&'a str>,
    pub content: &'a str,
}

/// Why a row was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("blank line")]
    Blank,

    #[error("blank sender label")]
    BlankSender,

    #[error("expected {expected} columns, found {found}")]
    MissingColumns { expected: usize, found: usize },

    #[error("invalid timestamp {value:?}: {source}")]
    BadTimestamp {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Parse one data row.  A trailing `\r` is ignored.
pub fn parse_row(line: &str, layout: Layout) -> Result<Row<'_>, RowError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.trim().is_empty() {
        return Err(RowError::Blank);
    }

    let expected = layout.columns();
    let fields: Vec<&str> = line.splitn(expected, ',').collect();
    if fields.len() != expected {
        return Err(RowError::MissingColumns {
            expected,
            found: fields.len(),
        });
    }

    let raw_ts = fields[0];
    let created_at = raw_ts
        .trim()
        .parse::<i64>()
        .map_err(|source| RowError::BadTimestamp {
            value: raw_ts.to_string(),
            source,
        })?;

    if fields[1].trim().is_empty() {
        return Err(RowError::BlankSender);
    }

    let row = match layout {
        Layout::Direct => Row {
            created_at,
            sender: fields[1],
            receiver: Some(fields[2]).filter(|r| !r.trim().is_empty()),
            content: fields[3],
        },
        Layout::Broadcast => Row {
            created_at,
            sender: fields[1],
            receiver: None,
            content: fields[2],
        },
    };
    Ok(row)
}
