//! Parsing of user input lines into view intents.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Search(String),
    Refresh,
    ShowHistory,
    /// 1-based index into the recent-search list
    Pick(usize),
    ToggleTheme,
    Help,
    Quit,
    Nothing,
}

impl Intent {
    /// Anything that is not a known command is a search.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match (command.to_ascii_lowercase().as_str(), rest) {
            ("", _) => Intent::Nothing,
            ("search" | "s", "") => Intent::Nothing,
            ("search" | "s", city) => Intent::Search(city.to_string()),
            ("refresh" | "r", "") => Intent::Refresh,
            ("history" | "h", "") => Intent::ShowHistory,
            ("pick" | "p", n) => match n.parse::<usize>() {
                Ok(n) if n > 0 => Intent::Pick(n),
                _ => Intent::Search(line.to_string()),
            },
            ("theme" | "t", "") => Intent::ToggleTheme,
            ("help" | "?", "") => Intent::Help,
            ("quit" | "exit" | "q", "") => Intent::Quit,
            _ => Intent::Search(line.to_string()),
        }
    }
}
