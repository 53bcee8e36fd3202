//! Line editor for the console: history on disk, completion of command
//! words, flags and the tickers currently on the watch list.

use std::path::PathBuf;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Config, Context, Editor, Helper};
use tracing::debug;

use crate::tickers::Ticker;

const CHECK_FLAGS: &[&str] = &["--dry-run", "--filing"];

pub struct CommandHelper {
    patterns: Vec<Vec<String>>,
    tickers: Vec<String>,
    hinter: HistoryHinter,
}

impl CommandHelper {
    pub fn new(patterns: &[&[&str]]) -> Self {
        Self {
            patterns: patterns
                .iter()
                .map(|p| p.iter().map(|s| s.to_string()).collect())
                .collect(),
            tickers: Vec::new(),
            hinter: HistoryHinter::default(),
        }
    }

    /// Replace the tickers offered as arguments.
    pub fn set_tickers(&mut self, tickers: &[Ticker]) {
        self.tickers = tickers.iter().map(|t| t.as_str().to_string()).collect();
    }

    /// Completions for the token under the cursor at the end of `line`:
    /// the byte offset where that token starts and the replacement texts.
    pub fn completions(&self, line: &str) -> (usize, Vec<String>) {
        let mut tokens: Vec<&str> = line.split_whitespace().collect();
        if line.is_empty() || line.ends_with(char::is_whitespace) {
            tokens.push("");
        }

        let (current, typed) = match tokens.split_last() {
            Some((current, typed)) => (*current, typed),
            None => return (line.len(), Vec::new()),
        };
        let start = line.len() - current.len();
        let slash = typed.is_empty() && current.starts_with('/');

        let typed: Vec<String> = typed
            .iter()
            .map(|t| t.trim_start_matches('/').to_lowercase())
            .collect();
        let prefix = current.trim_start_matches('/').to_lowercase();

        let mut found: Vec<String> = self
            .candidates(&typed)
            .into_iter()
            .filter(|c| c.to_lowercase().starts_with(&prefix))
            .map(|c| {
                if slash {
                    format!("/{} ", c)
                } else {
                    format!("{} ", c)
                }
            })
            .collect();
        found.sort();
        found.dedup();
        (start, found)
    }

    fn candidates(&self, typed: &[String]) -> Vec<String> {
        let words: Vec<&str> = typed.iter().map(String::as_str).collect();
        match words.as_slice() {
            ["add" | "remove" | "rm" | "snapshot" | "price"] | ["watch", "add" | "remove"] => {
                self.tickers.clone()
            }
            ["snapshot" | "price", _] => vec!["--as-of".to_string()],
            ["check" | "report", rest @ ..] => {
                if rest.last() == Some(&"--filing") {
                    return Vec::new();
                }
                let unused = |c: &str| !rest.iter().any(|r| r.eq_ignore_ascii_case(c));
                CHECK_FLAGS
                    .iter()
                    .filter(|f| unused(**f))
                    .map(|f| f.to_string())
                    .chain(self.tickers.iter().filter(|t| unused(t.as_str())).cloned())
                    .collect()
            }
            _ => self
                .patterns
                .iter()
                .filter(|p| {
                    p.len() > words.len()
                        && p.iter().zip(&words).all(|(p, w)| p.eq_ignore_ascii_case(w))
                })
                .map(|p| p[words.len()].clone())
                .collect(),
        }
    }
}

impl Helper for CommandHelper {}
impl Validator for CommandHelper {}
impl Highlighter for CommandHelper {}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, found) = self.completions(&line[..pos]);
        let pairs = found
            .into_iter()
            .map(|replacement| Pair {
                display: replacement.clone(),
                replacement,
            })
            .collect();
        Ok((start, pairs))
    }
}

/// `rustyline::Editor` with the console's completer and a history file.
pub struct Readline {
    editor: Editor<CommandHelper, DefaultHistory>,
    history_path: PathBuf,
}

impl Readline {
    pub fn new(
        command_patterns: &[&[&str]],
        history_path: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let config = Config::builder()
            .history_ignore_dups(true)?
            .history_ignore_space(true)
            .build();
        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(CommandHelper::new(command_patterns)));

        let history_path = history_path.unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".stockwatch").join(".history")
        });
        if let Some(parent) = history_path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                debug!("Cannot create history directory {:?}: {}", parent, e);
            }
        }
        if let Err(e) = editor.load_history(&history_path) {
            debug!("No console history loaded from {:?}: {}", history_path, e);
        }

        Ok(Self {
            editor,
            history_path,
        })
    }

    pub fn set_tickers(&mut self, tickers: &[Ticker]) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.set_tickers(tickers);
        }
    }

    pub fn readline(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        let line = self.editor.readline(prompt)?;
        if !line.trim().is_empty() {
            let _ = self.editor.add_history_entry(line.as_str());
            if let Err(e) = self.editor.append_history(&self.history_path) {
                debug!("Failed to save console history: {}", e);
            }
        }
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::COMMAND_PATTERNS;
    use tempfile::TempDir;

    fn helper() -> CommandHelper {
        let mut helper = CommandHelper::new(COMMAND_PATTERNS);
        helper.set_tickers(&[
            Ticker::parse("AAPL").unwrap(),
            Ticker::parse("AMZN").unwrap(),
            Ticker::parse("NVDA").unwrap(),
        ]);
        helper
    }

    #[test]
    fn test_command_words_keep_the_slash() {
        let h = helper();
        assert_eq!(h.completions("/a"), (0, vec!["/add ".to_string()]));
        assert!(h.completions("/s").1.contains(&"/snapshot ".to_string()));
        assert_eq!(h.completions("wa"), (0, vec!["watch ".to_string()]));
        assert_eq!(h.completions("watch re"), (6, vec!["remove ".to_string()]));
        assert!(h.completions("watch foo").1.is_empty());
    }

    #[test]
    fn test_watched_tickers_complete_after_commands() {
        let h = helper();
        assert_eq!(
            h.completions("/remove a"),
            (8, vec!["AAPL ".to_string(), "AMZN ".to_string()])
        );
        assert_eq!(h.completions("/snapshot nv"), (10, vec!["NVDA ".to_string()]));
        assert_eq!(h.completions("watch add AM"), (10, vec!["AMZN ".to_string()]));
        assert_eq!(
            h.completions("snapshot NVDA --"),
            (14, vec!["--as-of ".to_string()])
        );
        // `list` takes no argument
        assert!(h.completions("/list ").1.is_empty());
    }

    #[test]
    fn test_check_offers_unused_flags_and_tickers() {
        let h = helper();
        assert_eq!(
            h.completions("/check --"),
            (7, vec!["--dry-run ".to_string(), "--filing ".to_string()])
        );
        let (start, found) = h.completions("/check --dry-run AAPL ");
        assert_eq!(start, 22);
        assert_eq!(
            found,
            vec![
                "--filing ".to_string(),
                "AMZN ".to_string(),
                "NVDA ".to_string()
            ]
        );
        // The form type after --filing is free text
        assert!(h.completions("/check --filing ").1.is_empty());
    }

    #[test]
    fn test_ticker_list_is_replaced() {
        let mut h = helper();
        h.set_tickers(&[Ticker::parse("TSLA").unwrap()]);
        assert_eq!(h.completions("/add "), (5, vec!["TSLA ".to_string()]));
    }

    #[test]
    fn test_history_directory_is_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(".history");
        let mut rl = Readline::new(COMMAND_PATTERNS, Some(path)).unwrap();
        rl.set_tickers(&[Ticker::parse("AAPL").unwrap()]);
        assert!(dir.path().join("nested").is_dir());
    }
}
