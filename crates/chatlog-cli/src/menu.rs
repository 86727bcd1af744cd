//! Interactive numbered menu driving a [`ChatRoom`].
//!
//! The menu reads one choice per line from any `BufRead` and writes prompts
//! and results to any `Write`, so a session can be scripted in tests.

use std::io::{self, BufRead, Write};
use std::path::Path;

use chatlog_store::{ChatRoom, Message, User};
use chrono::Local;
use tracing::{debug, warn};

const MENU: &str = "\n1. Add user\n2. Switch user\n3. Send message\n4. Display messages\
                    \n5. Undo last message\n6. Save chat to CSV\n7. Load chat from CSV\
                    \n8. Search message\n9. Sort messages\n10. Exit\nChoice: ";

pub struct Menu<'a, R, W> {
    room: &'a mut ChatRoom,
    history_path: &'a Path,
    input: R,
    output: W,
    active: Option<User>,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(room: &'a mut ChatRoom, history_path: &'a Path, input: R, output: W) -> Self {
        Self {
            room,
            history_path,
            input,
            output,
            active: None,
        }
    }

    /// Run until the user picks "Exit" or input reaches EOF.
    pub fn run(mut self) -> io::Result<()> {
        loop {
            write!(self.output, "{MENU}")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                debug!("input closed, leaving menu");
                return Ok(());
            };
            let Ok(choice) = line.trim().parse::<u32>() else {
                writeln!(self.output, "Invalid input. Please enter a number.")?;
                continue;
            };

            match choice {
                1 => self.add_user()?,
                2 => self.switch_user()?,
                3 => self.send_message()?,
                4 => self.display_messages()?,
                5 => self.undo()?,
                6 => self.save()?,
                7 => self.load()?,
                8 => self.search()?,
                9 => {
                    self.room.sort_by_timestamp();
                    writeln!(self.output, "Messages sorted by timestamp.")?;
                }
                10 => {
                    writeln!(self.output, "Goodbye!")?;
                    return Ok(());
                }
                _ => writeln!(self.output, "Invalid choice. Please try again.")?,
            }
        }
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    fn add_user(&mut self) -> io::Result<()> {
        let label = self.prompt_label("Enter new username: ")?;
        if label.is_empty() {
            return writeln!(self.output, "Username cannot be empty.");
        }
        if self.room.add_user(label.as_str()).is_some() {
            writeln!(self.output, "User added: {label}")
        } else {
            writeln!(self.output, "User already exists: {label}")
        }
    }

    fn switch_user(&mut self) -> io::Result<()> {
        let label = self.prompt_label("Enter username to switch to: ")?;
        self.active = self.room.find_user(&label).cloned();
        match &self.active {
            Some(user) => writeln!(self.output, "Switched to user: {user}"),
            None => writeln!(self.output, "User not found. Please add the user first."),
        }
    }

    fn send_message(&mut self) -> io::Result<()> {
        let Some(sender) = self.active.clone() else {
            return writeln!(self.output, "Please switch to a user first.");
        };

        let receiver = if self.room.layout().has_receiver() {
            let label = self.prompt_label("Enter receiver's username: ")?;
            match self.room.find_user(&label).cloned() {
                Some(user) => Some(user),
                None => return writeln!(self.output, "Sender or receiver not found."),
            }
        } else {
            None
        };

        let content = self.prompt("Enter your message: ")?;
        self.room.add_message(&sender, receiver.as_ref(), content);
        writeln!(self.output, "Message sent.")
    }

    fn display_messages(&mut self) -> io::Result<()> {
        if self.room.is_empty() {
            return writeln!(self.output, "No messages.");
        }
        for message in self.room.messages() {
            writeln!(self.output, "[{}] {}", render_time(message), render_body(message))?;
        }
        Ok(())
    }

    fn undo(&mut self) -> io::Result<()> {
        match self.room.undo_last() {
            Some(_) => writeln!(self.output, "Last message undone."),
            None => writeln!(self.output, "No messages to undo."),
        }
    }

    fn save(&mut self) -> io::Result<()> {
        match self.room.save(self.history_path) {
            Ok(_) => writeln!(
                self.output,
                "Chat history saved to {}",
                self.history_path.display()
            ),
            Err(e) => {
                warn!(error = %e, "save failed");
                writeln!(self.output, "Unable to open file for writing.")
            }
        }
    }

    fn load(&mut self) -> io::Result<()> {
        match self.room.load(self.history_path) {
            Ok(report) => {
                writeln!(
                    self.output,
                    "Chat history loaded from {}",
                    self.history_path.display()
                )?;
                if report.skipped > 0 {
                    writeln!(self.output, "Skipped {} malformed rows.", report.skipped)?;
                }
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "load failed");
                writeln!(self.output, "Unable to open file for reading.")
            }
        }
    }

    fn search(&mut self) -> io::Result<()> {
        // The keyword is matched verbatim, surrounding spaces included.
        let keyword = self.prompt("Enter search keyword: ")?;
        let found = self
            .room
            .search(&keyword)
            .and_then(|i| self.room.message(i))
            .map(render_body);
        match found {
            Some(body) => writeln!(self.output, "Message found: {body}"),
            None => writeln!(self.output, "Message not found."),
        }
    }

    // ------------------------------------------------------------------
    // Input helpers
    // ------------------------------------------------------------------

    /// Read one line without its line terminator.  `None` on EOF.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    /// Print `text` and read the raw reply.  EOF reads as an empty reply.
    fn prompt(&mut self, text: &str) -> io::Result<String> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        Ok(self.read_line()?.unwrap_or_default())
    }

    fn prompt_label(&mut self, text: &str) -> io::Result<String> {
        Ok(self.prompt(text)?.trim().to_string())
    }
}

/// Local time in the classic `ctime` shape, e.g. `Tue Nov 14 22:13:20 2023`.
fn render_time(message: &Message) -> String {
    match message.created_at_utc() {
        Some(time) => time
            .with_timezone(&Local)
            .format("%a %b %e %H:%M:%S %Y")
            .to_string(),
        None => message.created_at().to_string(),
    }
}

fn render_body(message: &Message) -> String {
    match message.receiver() {
        Some(receiver) => format!(
            "{} to {}: {}",
            message.sender(),
            receiver,
            message.content()
        ),
        None => format!("{}: {}", message.sender(), message.content()),
    }
}
