//! Interactive session on stdin/stdout.
//!
//! Plain lines are search queries. Lines starting with `:` are commands;
//! an empty line stands in for the Enter key.

use tokio::io::{AsyncBufReadExt, BufReader};

use popcorn_api::MovieService;
use popcorn_core::keymap::Key;
use popcorn_runtime::{Message, Session};

use crate::render;
use crate::CliError;

const HELP: &str = "\
Type to search. Commands:
  :open N|ID   open result N or an IMDb id (again to close)
  :close       close the open movie
  :rate N      rate the open movie 1-10
  :add         add the open movie to your watched list
  :rm ID       remove a movie from your watched list
  :list        show your watched list
  :focus       focus the search input
  :blur        move focus away from the search input
  :esc         press Escape
  (empty)      press Enter
  :help        show this help
  :quit        leave";

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Query(String),
    Open(String),
    Send(Message),
    List,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Input::Send(Message::KeyPressed(Key::Enter));
    }
    let Some(command) = line.strip_prefix(':') else {
        return Input::Query(line.to_string());
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();
    match (name, arg) {
        ("open" | "o", Some(target)) => Input::Open(target.to_string()),
        ("close", None) => Input::Send(Message::CloseMovie),
        ("rate" | "r", Some(n)) => match n.parse::<u8>() {
            Ok(n) => Input::Send(Message::Rate(n)),
            Err(_) => Input::Unknown(line.to_string()),
        },
        ("add", None) => Input::Send(Message::AddWatched),
        ("rm", Some(id)) => Input::Send(Message::DeleteWatched(id.to_string())),
        ("list" | "ls", None) => Input::List,
        ("focus", None) => Input::Send(Message::SearchFocus(true)),
        ("blur", None) => Input::Send(Message::SearchFocus(false)),
        ("esc", None) => Input::Send(Message::KeyPressed(Key::Escape)),
        ("key", Some(key)) => Input::Send(Message::KeyPressed(Key::parse(key))),
        ("help" | "h", None) => Input::Help,
        ("quit" | "q", None) => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    }
}

/// Resolve `:open` targets: a 1-based result number, or an id as given.
fn open_target<S: MovieService + 'static>(session: &Session<S>, target: &str) -> String {
    if let Ok(n) = target.parse::<usize>() {
        let results = session.search().results;
        if let Some(movie) = n.checked_sub(1).and_then(|i| results.get(i)) {
            return movie.imdb_id.clone();
        }
    }
    target.to_string()
}

fn view<S: MovieService + 'static>(session: &Session<S>) -> String {
    let mut out = format!("── {} ──", session.title());
    if !session.query().is_empty() {
        out.push('\n');
        out.push_str(&render::search(&session.search()));
    }
    if session.selected_id().is_some() {
        let detail = session.detail();
        let watched = detail
            .imdb_id
            .as_deref()
            .and_then(|id| session.watched().user_rating(id));
        out.push_str("\n\n");
        out.push_str(&render::detail_state(
            &detail,
            watched,
            session.pending_rating(),
        ));
    } else {
        out.push_str("\n\n");
        out.push_str(&render::summary(&session.watched().summary()));
    }
    out
}

pub async fn run<S: MovieService + 'static>(session: &mut Session<S>) -> Result<(), CliError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}\n");
    println!("{}", view(session));

    while let Some(line) = lines.next_line().await? {
        let input = parse_input(&line);
        tracing::debug!(?input, "Input");

        let message = match input {
            Input::Quit => break,
            Input::Help => {
                println!("{HELP}");
                continue;
            }
            Input::List => {
                println!("{}", render::watched(session.watched().entries()));
                continue;
            }
            Input::Unknown(line) => {
                eprintln!("Unknown command: {line} (try :help)");
                continue;
            }
            Input::Query(query) => {
                session.update(Message::SearchFocus(true))?;
                Message::QueryChanged(query)
            }
            Input::Open(target) => Message::SelectMovie(open_target(session, &target)),
            Input::Send(message) => message,
        };

        if let Err(e) = session.update(message) {
            eprintln!("{e}");
            continue;
        }
        session.settled().await;
        println!("{}", view(session));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_queries_and_keys() {
        assert_eq!(parse_input("batman"), Input::Query("batman".into()));
        assert_eq!(parse_input("the dark knight\n"), Input::Query("the dark knight".into()));
        assert_eq!(parse_input(""), Input::Send(Message::KeyPressed(Key::Enter)));
        assert_eq!(parse_input("   "), Input::Send(Message::KeyPressed(Key::Enter)));
        assert_eq!(parse_input(":esc"), Input::Send(Message::KeyPressed(Key::Escape)));
        assert_eq!(
            parse_input(":key ESCAPE"),
            Input::Send(Message::KeyPressed(Key::Escape))
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_input(":open 2"), Input::Open("2".into()));
        assert_eq!(parse_input(":rate 8"), Input::Send(Message::Rate(8)));
        assert_eq!(parse_input(":add"), Input::Send(Message::AddWatched));
        assert_eq!(
            parse_input(":rm tt001"),
            Input::Send(Message::DeleteWatched("tt001".into()))
        );
        assert_eq!(parse_input(":list"), Input::List);
        assert_eq!(parse_input(":q"), Input::Quit);
    }

    #[test]
    fn test_parse_rejects_bad_commands() {
        assert_eq!(parse_input(":rate ten"), Input::Unknown(":rate ten".into()));
        assert_eq!(parse_input(":open"), Input::Unknown(":open".into()));
        assert_eq!(parse_input(":dance"), Input::Unknown(":dance".into()));
    }
}
