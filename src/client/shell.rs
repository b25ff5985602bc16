//! Interactive line-oriented front end for a [`Session`].

use std::str::FromStr;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::session::{Action, Session};
use super::state::AppState;
use super::view;

pub const HELP: &str = "\
Commands:
  add <text>     add a new todo
  toggle <n>     mark todo n complete / incomplete
  edit <n>       start editing todo n
  text <text>    replace the edit draft
  save           save the edit
  cancel         cancel the edit
  delete <n>     delete todo n
  reload         fetch the list again
  help           show this help
  quit           exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Toggle(usize),
    Edit(usize),
    Text(String),
    Save,
    Cancel,
    Delete(usize),
    Reload,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));

        let index = |rest: &str| -> Result<usize, String> {
            rest.trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("'{}' needs a todo number", word))
        };

        match word.trim_end() {
            "add" | "a" => Ok(Self::Add(rest.to_string())),
            "toggle" | "t" => Ok(Self::Toggle(index(rest)?)),
            "edit" | "e" => Ok(Self::Edit(index(rest)?)),
            "text" => Ok(Self::Text(rest.to_string())),
            "save" | "s" => Ok(Self::Save),
            "cancel" | "c" => Ok(Self::Cancel),
            "delete" | "d" => Ok(Self::Delete(index(rest)?)),
            "reload" | "r" => Ok(Self::Reload),
            "help" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            "" => Err(String::new()),
            other => Err(format!("Unknown command '{}'. Type 'help'.", other)),
        }
    }
}

/// Translate a command into session actions, resolving todo numbers against
/// the list currently on screen.
pub fn actions_for(command: Command, state: &AppState) -> Result<Vec<Action>, String> {
    let id_at = |n: usize| {
        state
            .todos()
            .get(n - 1)
            .map(|t| t.id)
            .ok_or_else(|| format!("There is no todo number {}", n))
    };

    let actions = match command {
        Command::Add(text) => vec![Action::SetDraft(text), Action::Add],
        Command::Toggle(n) => vec![Action::Toggle(id_at(n)?)],
        Command::Edit(n) => vec![Action::StartEdit(id_at(n)?)],
        Command::Text(text) => {
            if state.editing().is_none() {
                return Err("Not editing a todo. Use 'edit <n>' first.".to_string());
            }
            vec![Action::SetEditText(text)]
        }
        Command::Save => vec![Action::SaveEdit],
        Command::Cancel => vec![Action::CancelEdit],
        Command::Delete(n) => vec![Action::Delete(id_at(n)?)],
        Command::Reload => vec![Action::Load],
        Command::Help | Command::Quit => Vec::new(),
    };
    Ok(actions)
}

enum Event {
    Line(Option<String>),
    Dismissed(bool),
}

/// Run the shell on stdin/stdout until `quit` or end of input.
pub async fn run(mut session: Session) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}\n");
    session.dispatch(Action::Load).await;
    print!("{}", view::render(session.state()));

    loop {
        let event = tokio::select! {
            line = lines.next_line() => Event::Line(line?),
            dismissed = session.next_dismissal() => Event::Dismissed(dismissed),
        };

        match event {
            Event::Line(None) => break,
            Event::Line(Some(line)) => match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(Command::Help) => println!("{HELP}"),
                Ok(command) => match actions_for(command, session.state()) {
                    Ok(actions) => {
                        for action in actions {
                            session.dispatch(action).await;
                        }
                        print!("\n{}", view::render(session.state()));
                    }
                    Err(msg) => println!("{msg}"),
                },
                Err(msg) if msg.is_empty() => {}
                Err(msg) => println!("{msg}"),
            },
            Event::Dismissed(true) => print!("\n{}", view::render(session.state())),
            Event::Dismissed(false) => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::FakeApi;

    #[test]
    fn parses_commands_and_aliases() {
        assert_eq!(
            "add buy milk".parse::<Command>(),
            Ok(Command::Add("buy milk".to_string()))
        );
        assert_eq!("add".parse::<Command>(), Ok(Command::Add(String::new())));
        assert_eq!("t 2".parse::<Command>(), Ok(Command::Toggle(2)));
        assert_eq!("delete  3 ".parse::<Command>(), Ok(Command::Delete(3)));
        assert_eq!(
            "text walk the cat".parse::<Command>(),
            Ok(Command::Text("walk the cat".to_string()))
        );
        assert_eq!("q".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn rejects_bad_numbers_and_unknown_words() {
        assert!("toggle".parse::<Command>().is_err());
        assert!("toggle 0".parse::<Command>().is_err());
        assert!("edit two".parse::<Command>().is_err());
        assert!("frobnicate".parse::<Command>().is_err());
    }

    #[tokio::test]
    async fn numbers_resolve_against_the_displayed_list() {
        let api = FakeApi::with_todos(&["old", "new"]);
        let mut state = AppState::new();
        state.load(&api).await;

        let actions = actions_for(Command::Toggle(2), &state).unwrap();
        assert_eq!(actions, vec![Action::Toggle(state.todos()[1].id)]);

        assert!(actions_for(Command::Delete(3), &state).is_err());
    }

    #[test]
    fn add_sets_the_draft_before_adding() {
        let actions = actions_for(Command::Add("milk".to_string()), &AppState::new()).unwrap();
        assert_eq!(
            actions,
            vec![Action::SetDraft("milk".to_string()), Action::Add]
        );
    }

    #[test]
    fn text_requires_an_open_edit() {
        assert!(actions_for(Command::Text("x".to_string()), &AppState::new()).is_err());
    }
}
