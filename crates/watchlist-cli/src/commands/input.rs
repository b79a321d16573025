use watchlist_core::Key;

/// What a typed line asks the browser to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Key(Key),
    Query(String),
    Open(Target),
    Rate(u8),
    Add,
    Remove(Target),
    ToggleResults,
    ToggleWatched,
    Help,
    Quit,
    Invalid(String),
}

/// A movie picked either by its 1-based position in a list or by IMDb id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Index(usize),
    Id(String),
}

impl Target {
    fn parse(arg: &str) -> Option<Self> {
        let arg = arg.trim();
        if arg.is_empty() {
            return None;
        }
        match arg.parse::<usize>() {
            Ok(0) => None,
            Ok(n) => Some(Target::Index(n)),
            Err(_) => Some(Target::Id(arg.to_string())),
        }
    }

    /// Resolve against a list of ids in display order.
    pub fn resolve<'a>(&'a self, ids: impl IntoIterator<Item = &'a str>) -> Option<String> {
        match self {
            Target::Index(n) => ids.into_iter().nth(n - 1).map(str::to_string),
            Target::Id(id) => Some(id.clone()),
        }
    }
}

pub const ESCAPE_CHAR: char = '\u{1b}';

pub const HELP: &str = "\
  <text>          search for movies
  <blank line>    focus the search field and clear it
  :open N|ID      show details for result N (or an IMDb id); again to close
  :rate 1-10      rate the open movie
  :add            add the rated movie to your watched list
  :rm N|ID        remove watched movie N (or an IMDb id)
  :esc            close the details (Esc also works)
  :results        collapse/expand the results panel
  :watched        collapse/expand the watched panel
  :help           this help
  :quit           leave";

pub fn parse(line: &str) -> Input {
    let line = line.trim_end_matches(['\r', '\n']);

    if line.trim().is_empty() {
        return Input::Key(Key::Enter);
    }
    if line.trim() == ESCAPE_CHAR.to_string() {
        return Input::Key(Key::Escape);
    }

    let Some(command) = line.trim().strip_prefix(':') else {
        return Input::Query(line.to_string());
    };

    let mut parts = command.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default().to_ascii_lowercase();
    let arg = parts.next().unwrap_or_default().trim();

    match name.as_str() {
        "q" | "quit" | "exit" => Input::Quit,
        "esc" | "back" => Input::Key(Key::Escape),
        "h" | "help" | "?" => Input::Help,
        "a" | "add" => Input::Add,
        "results" => Input::ToggleResults,
        "watched" => Input::ToggleWatched,
        "o" | "open" => match Target::parse(arg) {
            Some(target) => Input::Open(target),
            None => Input::Invalid("usage: :open N|ID".to_string()),
        },
        "rm" | "remove" | "d" => match Target::parse(arg) {
            Some(target) => Input::Remove(target),
            None => Input::Invalid("usage: :rm N|ID".to_string()),
        },
        "r" | "rate" => match arg.parse::<u8>() {
            Ok(n) => Input::Rate(n),
            Err(_) => Input::Invalid("usage: :rate 1-10".to_string()),
        },
        other => Input::Invalid(format!("unknown command :{} (try :help)", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_is_enter() {
        assert_eq!(parse(""), Input::Key(Key::Enter));
        assert_eq!(parse("   \r\n"), Input::Key(Key::Enter));
    }

    #[test]
    fn test_escape() {
        assert_eq!(parse("\u{1b}"), Input::Key(Key::Escape));
        assert_eq!(parse(":esc"), Input::Key(Key::Escape));
    }

    #[test]
    fn test_plain_text_is_query() {
        assert_eq!(parse("The Matrix"), Input::Query("The Matrix".to_string()));
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse(":open 2"), Input::Open(Target::Index(2)));
        assert_eq!(parse(":o tt1375666"), Input::Open(Target::Id("tt1375666".to_string())));
        assert_eq!(parse(":rate 9"), Input::Rate(9));
        assert_eq!(parse(":add"), Input::Add);
        assert_eq!(parse(":rm 1"), Input::Remove(Target::Index(1)));
        assert_eq!(parse(":QUIT"), Input::Quit);
        assert!(matches!(parse(":open"), Input::Invalid(_)));
        assert!(matches!(parse(":open 0"), Input::Invalid(_)));
        assert!(matches!(parse(":rate nine"), Input::Invalid(_)));
        assert!(matches!(parse(":frobnicate"), Input::Invalid(_)));
    }

    #[test]
    fn test_target_resolve() {
        let ids = ["tt1", "tt2"];
        assert_eq!(Target::Index(2).resolve(ids), Some("tt2".to_string()));
        assert_eq!(Target::Index(3).resolve(ids), None);
        assert_eq!(
            Target::Id("tt9".to_string()).resolve(ids),
            Some("tt9".to_string())
        );
    }
}
