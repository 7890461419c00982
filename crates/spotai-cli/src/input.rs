//! Line input on a blocking thread.
//!
//! rustyline blocks while reading, so it runs on its own thread and forwards
//! parsed commands to the async game loop over a channel.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use spotai_core::deck::Side;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// A player command typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Enter / `s`: leave the landing screen.
    Start,
    Choose(Side),
    /// `p`: play again from the results screen.
    PlayAgain,
    Quit,
    Unknown,
}

pub fn parse_command(line: &str) -> Command {
    match line.trim().to_lowercase().as_str() {
        "" | "s" | "start" => Command::Start,
        "l" | "1" | "left" | "g" | "gauche" => Command::Choose(Side::Left),
        "r" | "2" | "right" | "d" | "droite" => Command::Choose(Side::Right),
        "p" | "play" | "again" | "rejouer" => Command::PlayAgain,
        "q" | "quit" | "exit" => Command::Quit,
        _ => Command::Unknown,
    }
}

/// Spawns the reader thread. The channel yields [`Command::Quit`] on EOF or
/// Ctrl-C and then closes.
pub fn spawn_reader() -> UnboundedReceiver<Command> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                tracing::error!("[Input] Failed to initialise line editor: {}", e);
                let _ = tx.send(Command::Quit);
                return;
            }
        };

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    if tx.send(parse_command(&line)).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                    let _ = tx.send(Command::Quit);
                    break;
                }
                Err(e) => {
                    tracing::error!("[Input] Read error: {}", e);
                    let _ = tx.send(Command::Quit);
                    break;
                }
            }
        }
    });

    rx
}
