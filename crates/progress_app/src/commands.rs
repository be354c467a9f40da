use progress_core::{GroupKind, StatusFilter, UnknownFilter};

/// One line typed on stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Filter(StatusFilter),
    Page(usize),
    Expand { kind: GroupKind, index: usize },
    Collapse { kind: GroupKind, index: usize },
    Open(String),
    Back,
    Refresh,
    Dismiss,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("expected a positive number, got `{0}`")]
    BadNumber(String),
    #[error("expected `errors` or `warnings`, got `{0}`")]
    BadGroupKind(String),
    #[error(transparent)]
    Filter(#[from] UnknownFilter),
}

pub const HELP: &str = "\
commands:
  search <text>                      filter rows by filename or email (empty clears)
  filter <all|completed|in-progress|with-errors|with-warnings>
  page <n>                           jump to page n
  expand <errors|warnings> <n>       show every line of group n
  collapse <errors|warnings> <n>     fold group n back to one row
  open <filename>                    show one record
  back                               return to the list
  refresh                            fetch now
  dismiss                            hide the error banner
  quit";

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Option<Result<Command, CommandError>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        // Search keeps inner whitespace; an empty search clears the box.
        "search" | "s" => Ok(Command::Search(rest.to_string())),
        "filter" | "f" => {
            let value = if rest.is_empty() { "all" } else { rest };
            value
                .parse::<StatusFilter>()
                .map(Command::Filter)
                .map_err(CommandError::from)
        }
        "page" | "p" => number(rest, "page").map(Command::Page),
        "expand" | "e" => group_target(rest, "expand")
            .map(|(kind, index)| Command::Expand { kind, index }),
        "collapse" | "c" => group_target(rest, "collapse")
            .map(|(kind, index)| Command::Collapse { kind, index }),
        "open" | "o" => {
            if rest.is_empty() {
                Err(CommandError::MissingArgument("open"))
            } else {
                Ok(Command::Open(rest.to_string()))
            }
        }
        "back" | "b" => Ok(Command::Back),
        "refresh" | "r" => Ok(Command::Refresh),
        "dismiss" | "d" => Ok(Command::Dismiss),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    };
    Some(command)
}

fn number(text: &str, command: &'static str) -> Result<usize, CommandError> {
    if text.is_empty() {
        return Err(CommandError::MissingArgument(command));
    }
    match text.parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(CommandError::BadNumber(text.to_string())),
    }
}

/// `<errors|warnings> <n>` with a 1-based group number, returned 0-based.
fn group_target(text: &str, command: &'static str) -> Result<(GroupKind, usize), CommandError> {
    let mut parts = text.split_whitespace();
    let kind = match parts.next() {
        Some("errors" | "error" | "err") => GroupKind::Errors,
        Some("warnings" | "warning" | "warn") => GroupKind::Warnings,
        Some(other) => return Err(CommandError::BadGroupKind(other.to_string())),
        None => return Err(CommandError::MissingArgument(command)),
    };
    let index = number(parts.next().unwrap_or(""), command)?;
    Ok((kind, index - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(line: &str) -> Command {
        parse(line).unwrap().unwrap()
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse("   "), None);
    }

    #[test]
    fn search_keeps_inner_spaces() {
        assert_eq!(ok("search  sales data "), Command::Search("sales data".to_string()));
        assert_eq!(ok("search"), Command::Search(String::new()));
    }

    #[test]
    fn filter_defaults_to_all() {
        assert_eq!(ok("filter"), Command::Filter(StatusFilter::All));
        assert_eq!(
            ok("filter with-errors"),
            Command::Filter(StatusFilter::WithErrors)
        );
        assert!(matches!(
            parse("filter bogus"),
            Some(Err(CommandError::Filter(_)))
        ));
    }

    #[test]
    fn group_numbers_are_one_based() {
        assert_eq!(
            ok("expand errors 1"),
            Command::Expand {
                kind: GroupKind::Errors,
                index: 0
            }
        );
        assert_eq!(
            ok("collapse warnings 3"),
            Command::Collapse {
                kind: GroupKind::Warnings,
                index: 2
            }
        );
        assert_eq!(
            parse("expand errors 0"),
            Some(Err(CommandError::BadNumber("0".to_string())))
        );
        assert_eq!(
            parse("expand lines 1"),
            Some(Err(CommandError::BadGroupKind("lines".to_string())))
        );
    }

    #[test]
    fn page_and_open_need_arguments() {
        assert_eq!(ok("page 2"), Command::Page(2));
        assert_eq!(
            parse("page"),
            Some(Err(CommandError::MissingArgument("page")))
        );
        assert_eq!(
            parse("open"),
            Some(Err(CommandError::MissingArgument("open")))
        );
        assert_eq!(ok("open q3 report.csv"), Command::Open("q3 report.csv".to_string()));
    }

    #[test]
    fn unknown_words_are_reported() {
        assert_eq!(
            parse("launch"),
            Some(Err(CommandError::Unknown("launch".to_string())))
        );
        assert_eq!(ok("Q"), Command::Quit);
    }
}
