//! Line-oriented interactive shell
//!
//! One command per line; after every command the active view is rendered
//! again. The shell never stops on a command failure: the controller has
//! already turned it into a notice, which the next render shows.
//!
//! Commands that wait on the service run in the background, so input keeps
//! flowing while they are out. The view is rendered again when each one
//! finishes, and `quit` or end of input waits for them first.

use std::io::Write;
use std::str::FromStr;

use anyhow::Context;
use futures_util::future::LocalBoxFuture;
use futures_util::stream::FuturesUnordered;
use futures_util::{FutureExt, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::config::DisplaySettings;
use crate::form::ListEdit;
use crate::model::{CommunicationStyle, ListField};
use crate::session::{View, ViewController};
use crate::views;

const HELP: &str = "\
Commands:
  go <home|create|explore|conversations>   switch view
  refresh                                   reload users and conversations
  set name|username|quirks|background <text>
  set style <casual|professional|witty|enthusiastic|thoughtful|warm>
  type <interests|traits|topics> <text>     stage text without adding it
  add <interests|traits|topics> [text]      add text (or the staged text)
  rm <interests|traits|topics> <index>      remove an entry (0-based)
  reset                                     clear the form
  submit                                    create your AI clone
  talk <user_id> [topic]                    generate a conversation
  ok                                        dismiss the current notice
  help | quit";

/// Form text fields settable with `set`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    Username,
    Quirks,
    Background,
}

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Go(View),
    Refresh,
    Set(TextField, String),
    Style(CommunicationStyle),
    Stage(ListField, String),
    Add(ListField, Option<String>),
    Remove(ListField, usize),
    Reset,
    Submit,
    Talk { user_id: String, topic: Option<String> },
    Dismiss,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = split_word(line);
        let command = match word.to_lowercase().as_str() {
            "go" => ShellCommand::Go(rest.parse()?),
            "home" | "create" | "explore" | "conversations" => ShellCommand::Go(word.parse()?),
            "refresh" => ShellCommand::Refresh,
            "set" => {
                let (field, value) = split_word(rest);
                match field.to_lowercase().as_str() {
                    "name" => ShellCommand::Set(TextField::Name, value.to_string()),
                    "username" => ShellCommand::Set(TextField::Username, value.to_string()),
                    "quirks" => ShellCommand::Set(TextField::Quirks, value.to_string()),
                    "background" => ShellCommand::Set(TextField::Background, value.to_string()),
                    "style" => ShellCommand::Style(value.parse()?),
                    "" => return Err("Usage: set <field> <text>".to_string()),
                    other => return Err(format!("Unknown field '{}'", other)),
                }
            }
            "type" => {
                let (field, value) = split_word(rest);
                ShellCommand::Stage(field.parse()?, value.to_string())
            }
            "add" => {
                let (field, value) = split_word(rest);
                let value = (!value.is_empty()).then(|| value.to_string());
                ShellCommand::Add(field.parse()?, value)
            }
            "rm" | "remove" => {
                let (field, index) = split_word(rest);
                let index = index
                    .parse()
                    .map_err(|_| format!("Invalid index '{}'", index))?;
                ShellCommand::Remove(field.parse()?, index)
            }
            "reset" => ShellCommand::Reset,
            "submit" => ShellCommand::Submit,
            "talk" => {
                let (user_id, topic) = split_word(rest);
                if user_id.is_empty() {
                    return Err("Usage: talk <user_id> [topic]".to_string());
                }
                ShellCommand::Talk {
                    user_id: user_id.to_string(),
                    topic: (!topic.is_empty()).then(|| topic.to_string()),
                }
            }
            "ok" | "dismiss" => ShellCommand::Dismiss,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            "" => return Err(String::new()),
            other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
        };
        Ok(command)
    }
}

fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim();
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}

/// What a command left behind
enum Step<'a> {
    /// Finished, with an optional line to print before the view
    Done(Option<String>),
    /// Still waiting on the service
    Pending(LocalBoxFuture<'a, Option<String>>),
}

/// Run the shell until `quit` or end of input.
pub async fn run<R, W>(
    controller: &ViewController,
    display: &DisplaySettings,
    input: R,
    mut output: W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    controller.initialize().await;
    write!(output, "{}", views::render(&controller.state(), display))?;

    let mut lines = input.lines();
    let mut pending: FuturesUnordered<LocalBoxFuture<'_, Option<String>>> = FuturesUnordered::new();
    let mut reading = true;
    loop {
        if reading {
            write!(output, "aiclone> ")?;
            output.flush()?;
        }

        let message = tokio::select! {
            line = lines.next_line(), if reading => {
                let Some(line) = line.context("Failed to read command")? else {
                    writeln!(output)?;
                    reading = false;
                    continue;
                };

                let command = match line.parse::<ShellCommand>() {
                    Ok(command) => command,
                    Err(message) if message.is_empty() => continue,
                    Err(message) => {
                        writeln!(output, "{}", message)?;
                        continue;
                    }
                };
                debug!(?command, "Shell command");

                match command {
                    ShellCommand::Quit => {
                        reading = false;
                        continue;
                    }
                    ShellCommand::Help => {
                        writeln!(output, "{}", HELP)?;
                        continue;
                    }
                    command => match execute(controller, command) {
                        Step::Done(message) => message,
                        Step::Pending(operation) => {
                            pending.push(operation);
                            // Run it up to its first wait so the view shows it in flight.
                            match pending.next().now_or_never() {
                                Some(Some(message)) => message,
                                _ => None,
                            }
                        }
                    },
                }
            }
            Some(message) = pending.next(), if !pending.is_empty() => message,
            else => break,
        };

        if let Some(message) = message {
            writeln!(output, "{}", message)?;
        }
        write!(output, "{}", views::render(&controller.state(), display))?;
    }

    Ok(())
}

/// Apply one command; service calls come back as `Step::Pending`.
fn execute(controller: &ViewController, command: ShellCommand) -> Step<'_> {
    match command {
        ShellCommand::Go(view) => controller.navigate(view),
        ShellCommand::Refresh => {
            return Step::Pending(Box::pin(async move {
                let (users, conversations) =
                    tokio::join!(controller.refresh_users(), controller.refresh_conversations());
                users
                    .and(conversations)
                    .err()
                    .map(|e| format!("Refresh incomplete: {}", e))
            }));
        }
        ShellCommand::Set(field, value) => controller.edit_form(|form| match field {
            TextField::Name => form.name = value,
            TextField::Username => form.username = value,
            TextField::Quirks => form.speaking_quirks = value,
            TextField::Background => form.background = value,
        }),
        ShellCommand::Style(style) => controller.edit_form(|form| form.communication_style = Some(style)),
        ShellCommand::Stage(field, text) => controller.edit_form(|form| form.set_pending(field, text)),
        ShellCommand::Add(field, text) => {
            let edit = controller.edit_form(|form| match text {
                Some(text) => form.add_list_item(field, &text),
                None => form.commit_pending(field),
            });
            return Step::Done(describe_edit(field, edit));
        }
        ShellCommand::Remove(field, index) => {
            let edit = controller.edit_form(|form| form.remove_list_item(field, index));
            return Step::Done(describe_edit(field, edit));
        }
        ShellCommand::Reset => controller.edit_form(|form| form.reset()),
        ShellCommand::Submit => {
            return Step::Pending(Box::pin(async move {
                let _ = controller.submit_persona().await;
                None
            }));
        }
        ShellCommand::Talk { user_id, topic } => {
            return Step::Pending(Box::pin(async move {
                let _ = controller.generate_conversation(&user_id, topic.as_deref()).await;
                None
            }));
        }
        ShellCommand::Dismiss => {
            controller.dismiss_notice();
        }
        ShellCommand::Help | ShellCommand::Quit => {}
    }
    Step::Done(None)
}

fn describe_edit(field: ListField, edit: ListEdit) -> Option<String> {
    match edit {
        ListEdit::Added { .. } => None,
        ListEdit::Removed(value) => Some(format!("Removed '{}' from {}", value, field.label())),
        ListEdit::Skipped(reason) => Some(format!("Nothing changed in {} ({:?})", field.label(), reason)),
    }
}
