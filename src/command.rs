//! Line protocol parsing
//!
//! A line starting with `/` names an explicit action: the first token after
//! the slash is the action, the trimmed remainder is the body. Any other line
//! is plain text, which means `register` for an anonymous session and
//! `message` for a registered one.

/// A raw input line split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// `/<action> <body>`
    Action { action: String, body: String },
    /// Anything not starting with `/`
    Text(String),
}

/// Split a raw line into an action and body
///
/// Returns `None` for lines that should not be dispatched at all: empty
/// (or whitespace-only) lines and a bare `/`.
pub fn parse_line(raw: &str) -> Option<ParsedLine> {
    let line = raw.trim();
    if line.is_empty() {
        return None;
    }

    let Some(rest) = line.strip_prefix('/') else {
        return Some(ParsedLine::Text(line.to_string()));
    };

    let (action, body) = match rest.split_once(char::is_whitespace) {
        Some((action, body)) => (action, body.trim()),
        None => (rest, ""),
    };

    if action.is_empty() {
        return None;
    }

    Some(ParsedLine::Action {
        action: action.to_string(),
        body: body.to_string(),
    })
}

/// A client command, ready for dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Register(String),
    Message(String),
    Quit,
    Ignore(String),
    Enter(String),
    Leave,
    Rooms,
    Users(String),
    /// Raw `<recipient> <message>` body
    Pm(String),
    Help,
    Unrecognized(String),
}

impl Command {
    /// Build a command from an explicit action name and its body
    pub fn from_action(action: &str, body: String) -> Self {
        match action {
            "register" | "user" => Command::Register(body),
            "message" => Command::Message(body),
            "quit" | "disconnect" => Command::Quit,
            "ignore" => Command::Ignore(body),
            "enter" => Command::Enter(body),
            "leave" => Command::Leave,
            "rooms" => Command::Rooms,
            "users" => Command::Users(body),
            "pm" => Command::Pm(body),
            "help" => Command::Help,
            other => Command::Unrecognized(other.to_string()),
        }
    }

    /// Resolve a parsed line against the session's registration state
    pub fn resolve(parsed: ParsedLine, registered: bool) -> Self {
        match parsed {
            ParsedLine::Action { action, body } => Self::from_action(&action, body),
            ParsedLine::Text(text) if registered => Command::Message(text),
            ParsedLine::Text(text) => Command::Register(text),
        }
    }

    /// Whether an anonymous session may issue this command
    pub fn allowed_anonymously(&self) -> bool {
        matches!(self, Command::Register(_) | Command::Quit)
    }
}

/// Prompt sent to every newly accepted connection
pub const GREETING: &str = "please register using /register <username>";

/// Static command listing sent in reply to `/help`
pub const HELP_TEXT: &str = "\
available commands:
  /register <username>   choose your username
  /enter <room>          enter (or create) a room
  /leave                 go back to the lobby
  /rooms                 list active rooms
  /users [room]          list users in your room or in the given room
  /pm <user> <message>   send a private message
  /ignore <user>         stop receiving messages from a user
  /help                  show this help
  /quit                  disconnect";

#[cfg(test)]
mod tests {
    use super::*;

    fn action(action: &str, body: &str) -> Option<ParsedLine> {
        Some(ParsedLine::Action {
            action: action.to_string(),
            body: body.to_string(),
        })
    }

    #[test]
    fn test_parse_action_and_body() {
        assert_eq!(parse_line("/enter gameroom\n"), action("enter", "gameroom"));
        assert_eq!(parse_line("/pm bob  see you  "), action("pm", "bob  see you"));
        assert_eq!(parse_line("/leave"), action("leave", ""));
        assert_eq!(parse_line("/users\t"), action("users", ""));
    }

    #[test]
    fn test_parse_plain_text() {
        assert_eq!(
            parse_line("  hello there \r\n"),
            Some(ParsedLine::Text("hello there".to_string()))
        );
    }

    #[test]
    fn test_parse_ignores_empty_lines() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   \r\n"), None);
        assert_eq!(parse_line("/"), None);
        assert_eq!(parse_line("/  body"), None);
    }

    #[test]
    fn test_resolve_plain_text() {
        let text = ParsedLine::Text("alice".to_string());
        assert_eq!(
            Command::resolve(text.clone(), false),
            Command::Register("alice".to_string())
        );
        assert_eq!(
            Command::resolve(text, true),
            Command::Message("alice".to_string())
        );
    }

    #[test]
    fn test_resolve_actions() {
        let parsed = parse_line("/disconnect").unwrap();
        assert_eq!(Command::resolve(parsed, true), Command::Quit);

        let parsed = parse_line("/user alice").unwrap();
        assert_eq!(
            Command::resolve(parsed, false),
            Command::Register("alice".to_string())
        );

        let parsed = parse_line("/dance wildly").unwrap();
        assert_eq!(
            Command::resolve(parsed, true),
            Command::Unrecognized("dance".to_string())
        );
    }

    #[test]
    fn test_allowed_anonymously() {
        assert!(Command::Register("a".to_string()).allowed_anonymously());
        assert!(Command::Quit.allowed_anonymously());
        assert!(!Command::Help.allowed_anonymously());
        assert!(!Command::Rooms.allowed_anonymously());
        assert!(!Command::Message("hi".to_string()).allowed_anonymously());
    }
}
