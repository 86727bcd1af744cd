//! Saving and loading a [`ChatRoom`] to and from its flat history file.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::codec::{self, Row};
use crate::error::{Result, StoreError};
use crate::models::Message;
use crate::room::ChatRoom;

/// Outcome of a successful load.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// Messages now in the room.
    pub loaded: usize,
    /// Data rows that were malformed and dropped.
    pub skipped: usize,
    /// Users that did not exist before the load.
    pub users_created: usize,
}

impl ChatRoom {
    /// Write the header and every message, in current order, to `path`.
    ///
    /// The file is truncated on open.  Returns the number of rows written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| StoreError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        let written = self
            .write_rows(&mut writer)
            .and_then(|n| writer.flush().map(|_| n))
            .map_err(|e| StoreError::io(path, e))?;

        info!(path = %path.display(), count = written, "saved chat history");
        Ok(written)
    }

    /// Write the history to an arbitrary stream.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize> {
        Ok(self.write_rows(writer)?)
    }

    fn write_rows<W: Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        writeln!(writer, "{}", codec::header(self.layout()))?;
        for message in self.messages() {
            writeln!(writer, "{}", codec::encode_row(message, self.layout()))?;
        }
        Ok(self.count())
    }

    /// Replace the message sequence with the contents of `path`.
    ///
    /// The file is read completely before anything changes, so on error the
    /// room is left exactly as it was.  Known users are kept; unknown labels
    /// are added.  Malformed rows are skipped and counted.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<LoadReport> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
        let lines = read_lines(BufReader::new(file)).map_err(|e| StoreError::io(path, e))?;

        let report = self.apply_lines(&lines);
        info!(
            path = %path.display(),
            loaded = report.loaded,
            skipped = report.skipped,
            users_created = report.users_created,
            "loaded chat history"
        );
        Ok(report)
    }

    /// Like [`Self::load`] but from an arbitrary reader.
    pub fn read_from<R: BufRead>(&mut self, reader: R) -> Result<LoadReport> {
        let lines = read_lines(reader)?;
        Ok(self.apply_lines(&lines))
    }

    fn apply_lines(&mut self, lines: &[String]) -> LoadReport {
        let layout = self.layout();
        let users_before = self.users().len();
        let mut report = LoadReport::default();
        let mut messages = Vec::new();

        let mut iter = lines.iter().enumerate();
        if let Some((_, header)) = iter.next() {
            let header = header.trim_end_matches('\r');
            if header != codec::header(layout) {
                warn!(found = %header, "unexpected header row, discarding it anyway");
            }
        }

        for (idx, line) in iter {
            match codec::parse_row(line, layout) {
                Ok(row) => messages.push(self.message_from_row(&row)),
                Err(reason) => {
                    warn!(line = idx + 1, %reason, "skipping malformed row");
                    report.skipped += 1;
                }
            }
        }

        report.loaded = messages.len();
        report.users_created = self.users().len() - users_before;
        self.replace_messages(messages);
        report
    }

    fn message_from_row(&mut self, row: &Row<'_>) -> Message {
        let sender = self.find_or_create_user(row.sender);
        let receiver = row.receiver.map(|label| self.find_or_create_user(label));
        Message::with_timestamp(sender, receiver, row.content, row.created_at)
    }
}

fn read_lines<R: BufRead>(reader: R) -> std::io::Result<Vec<String>> {
    reader.lines().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Layout, User};

    fn labels(room: &ChatRoom) -> Vec<&str> {
        room.users().iter().map(User::label).collect()
    }

    fn tuples(room: &ChatRoom) -> Vec<(String, Option<String>, String, i64)> {
        room.messages()
            .iter()
            .map(|m| {
                (
                    m.sender().label().to_string(),
                    m.receiver().map(|u| u.label().to_string()),
                    m.content().to_string(),
                    m.created_at(),
                )
            })
            .collect()
    }

    fn seeded(layout: Layout) -> ChatRoom {
        let mut room = ChatRoom::new(layout);
        let alice = room.add_user("Alice").cloned().unwrap();
        let bob = room.add_user("Bob").cloned().unwrap();
        let carol = room.add_user("Carol").cloned().unwrap();
        let receiver = |u: &User| layout.has_receiver().then(|| u.clone());
        room.push_message(Message::with_timestamp(alice.clone(), receiver(&bob), "hello", 100));
        room.push_message(Message::with_timestamp(bob.clone(), receiver(&alice), "hi", 50));
        room.push_message(Message::with_timestamp(carol, receiver(&alice), "hey all", 75));
        room
    }

    #[test]
    fn test_write_to_format() {
        let room = seeded(Layout::Direct);
        let mut out = Vec::new();
        assert_eq!(room.write_to(&mut out).unwrap(), 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Timestamp,Sender,Receiver,Content\n\
             100,Alice,Bob,hello\n\
             50,Bob,Alice,hi\n\
             75,Carol,Alice,hey all\n"
        );
    }

    #[test]
    fn test_round_trip_direct() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let room = seeded(Layout::Direct);
        room.save(&path).expect("save");

        let mut reloaded = ChatRoom::new(Layout::Direct);
        reloaded.add_user("Alice");
        reloaded.add_user("Bob");
        reloaded.add_user("Carol");
        let report = reloaded.load(&path).expect("load");

        assert_eq!(report.loaded, 3);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.users_created, 0);
        assert_eq!(tuples(&reloaded), tuples(&room));
        assert_eq!(reloaded.undo_depth(), 3);
    }

    #[test]
    fn test_round_trip_broadcast() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let room = seeded(Layout::Broadcast);
        room.save(&path).expect("save");

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Timestamp,Sender,Content\n100,Alice,hello\n"));

        let mut reloaded = ChatRoom::new(Layout::Broadcast);
        reloaded.load(&path).expect("load");
        assert_eq!(tuples(&reloaded), tuples(&room));
    }

    #[test]
    fn test_load_into_fresh_room_creates_users() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        seeded(Layout::Direct).save(&path).unwrap();

        let mut fresh = ChatRoom::new(Layout::Direct);
        let report = fresh.load(&path).unwrap();

        assert_eq!(report.users_created, 3);
        assert_eq!(labels(&fresh), vec!["Alice", "Bob", "Carol"]);
        let contents: Vec<_> = fresh.messages().iter().map(Message::content).collect();
        assert_eq!(contents, vec!["hello", "hi", "hey all"]);
    }

    #[test]
    fn test_load_keeps_existing_users_and_replaces_messages() {
        let mut room = ChatRoom::new(Layout::Direct);
        let dave = room.add_user("Dave").cloned().unwrap();
        room.add_message(&dave, None, "old");

        let input = "Timestamp,Sender,Receiver,Content\n9,Alice,Dave,new\n";
        room.read_from(input.as_bytes()).unwrap();

        assert_eq!(labels(&room), vec!["Dave", "Alice"]);
        assert_eq!(room.count(), 1);
        assert_eq!(room.messages()[0].content(), "new");
        assert_eq!(room.messages()[0].created_at(), 9);
    }

    #[test]
    fn test_load_uses_exact_labels() {
        let mut room = ChatRoom::new(Layout::Direct);
        room.add_user("Alice");
        room.read_from("h\n1,alice,Alice,x\n".as_bytes()).unwrap();
        assert_eq!(labels(&room), vec!["Alice", "alice"]);
    }

    #[test]
    fn test_blank_labels_never_become_users_across_round_trip() {
        let mut room = ChatRoom::new(Layout::Direct);
        let alice = room.add_user("Alice").cloned().unwrap();
        assert!(room.add_user("").is_none());
        assert!(room.find_user("").is_none());
        room.push_message(Message::with_timestamp(alice, None, "hi", 7));

        let mut out = Vec::new();
        room.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("7,Alice,,hi\n"));

        let mut reloaded = ChatRoom::new(Layout::Direct);
        let input = format!("{text}8,,Alice,no sender\n9,Alice, ,spaces\n");
        let report = reloaded.read_from(input.as_bytes()).unwrap();

        assert_eq!(report.loaded, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(labels(&reloaded), vec!["Alice"]);
        assert_eq!(tuples(&reloaded)[0], tuples(&room)[0]);
        assert_eq!(reloaded.messages()[1].receiver(), None);
    }

    #[test]
    fn test_load_skips_malformed_rows() {
        let input = "Timestamp,Sender,Receiver,Content\n\
                     1,Alice,Bob,ok\n\
                     \n\
                     later,Alice,Bob,bad time\n\
                     2,Alice,short\n\
                     3,Bob,Alice,also ok\n";
        let mut room = ChatRoom::new(Layout::Direct);
        let report = room.read_from(input.as_bytes()).unwrap();

        assert_eq!(report.loaded, 2);
        assert_eq!(report.skipped, 3);
        assert_eq!(room.messages()[1].content(), "also ok");
    }

    #[test]
    fn test_load_empty_input_clears_messages() {
        let mut room = seeded(Layout::Direct);
        let report = room.read_from("".as_bytes()).unwrap();
        assert_eq!(report, LoadReport::default());
        assert!(room.is_empty());
        assert_eq!(room.undo_depth(), 0);
        assert_eq!(room.users().len(), 3);
    }

    #[test]
    fn test_load_missing_file_leaves_room_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut room = seeded(Layout::Direct);
        let before = tuples(&room);

        let err = room.load(dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert_eq!(tuples(&room), before);
        assert_eq!(room.undo_depth(), 3);
    }

    #[test]
    fn test_save_to_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let room = seeded(Layout::Direct);
        let err = room.save(dir.path().join("no/such/dir/history.csv")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
