//! Line-oriented command console over a [`FileStorage`].
//!
//! Two surface syntaxes are accepted and normalized into the same dispatch:
//!
//! - shell style: `update User 1234 first_name "Betty"`
//! - call style: `User.update("1234", "first_name", "Betty")`
//!
//! A call-style line is rewritten to `<Class> <args>` and handed to the same
//! verb as its shell-style form. See [`parser`] for tokenization and
//! [`commands`] for the verb table.

pub mod commands;
pub mod literal;
pub mod parser;

use std::io::{self, BufRead, IsTerminal, Write};

use crate::config::Config;
use crate::error::{CommandError, ConsoleError};
use crate::storage::FileStorage;
use commands::{Reply, Verb};

/// Whether the console keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

pub struct Console<W: Write> {
    storage: FileStorage,
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(storage: FileStorage, out: W) -> Self {
        Self { storage, out }
    }

    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_storage(self) -> FileStorage {
        self.storage
    }

    /// Execute one line of input.
    ///
    /// User mistakes are printed and the console continues. Only storage and
    /// output failures come back as `Err`.
    pub fn execute(&mut self, line: &str) -> Result<Control, ConsoleError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Control::Continue);
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));
        let result = match Verb::from_str(word) {
            Some(verb) => self.run(verb, rest, line),
            None => match rewrite_call(line) {
                Some((verb, args)) => self.run(verb, &args, line),
                None => Err(CommandError::UnknownSyntax(line.to_string())),
            },
        };

        match result {
            Ok(Reply::Silent) => Ok(Control::Continue),
            Ok(Reply::Print(text)) => {
                writeln!(self.out, "{}", text)?;
                Ok(Control::Continue)
            }
            Ok(Reply::Quit) => Ok(Control::Exit),
            Ok(Reply::EndOfInput) => {
                self.end_of_input()?;
                Ok(Control::Exit)
            }
            Err(CommandError::Storage(e)) => Err(e.into()),
            Err(e) => {
                tracing::debug!(line, error = %e, "Command rejected");
                writeln!(self.out, "{}", e)?;
                Ok(Control::Continue)
            }
        }
    }

    /// Read and execute lines from `input` until `quit` or end of input.
    ///
    /// `prompt` is written before each line when given.
    pub fn interact<R: BufRead>(
        &mut self,
        mut input: R,
        prompt: Option<&str>,
    ) -> Result<(), ConsoleError> {
        let mut line = String::new();
        loop {
            if let Some(prompt) = prompt {
                write!(self.out, "{}", prompt)?;
                self.out.flush()?;
            }

            line.clear();
            if input.read_line(&mut line)? == 0 {
                return self.end_of_input();
            }
            if self.execute(&line)? == Control::Exit {
                return Ok(());
            }
        }
    }

    fn run(&mut self, verb: Verb, args: &str, line: &str) -> Result<Reply, CommandError> {
        let tokens = parser::parse(args).map_err(|e| {
            tracing::debug!(error = %e, "Tokenization failed");
            CommandError::UnknownSyntax(line.to_string())
        })?;
        commands::dispatch(&mut self.storage, verb, &tokens)
    }

    fn end_of_input(&mut self) -> Result<(), ConsoleError> {
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Rewrite a call-style line `<Class>.<verb>(<args>)` into the verb and its
/// shell-style argument text `<Class> <args>`.
///
/// Returns `None` unless the text between the first `.` and the first `(`
/// names a callable verb and a `)` closes the argument list.
pub fn rewrite_call(line: &str) -> Option<(Verb, String)> {
    let (class, call) = line.split_once('.')?;
    let open = call.find('(')?;
    let close = call.rfind(')').filter(|&close| close > open)?;
    let verb = Verb::from_str(&call[..open]).filter(Verb::is_callable)?;
    Some((verb, format!("{} {}", class, &call[open + 1..close])))
}

/// Open the store named by `config` and run the console on stdin/stdout.
///
/// With `config.commands` set, those lines run in order instead of reading
/// stdin. The store is never flushed on exit; commands persist as they go.
pub fn run(config: &Config) -> Result<(), ConsoleError> {
    let storage = FileStorage::open(&config.file)?;
    let mut console = Console::new(storage, io::stdout().lock());

    if config.commands.is_empty() {
        let stdin = io::stdin();
        let prompt = stdin.is_terminal().then_some(config.prompt.as_str());
        console.interact(stdin.lock(), prompt)?;
    } else {
        for line in &config.commands {
            if console.execute(line)? == Control::Exit {
                break;
            }
        }
    }

    console.into_storage().close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_call_without_args() {
        assert_eq!(rewrite_call("User.all()"), Some((Verb::All, "User ".to_string())));
        assert_eq!(rewrite_call("User.count()"), Some((Verb::Count, "User ".to_string())));
    }

    #[test]
    fn test_rewrite_call_with_args() {
        assert_eq!(
            rewrite_call(r#"User.update("38f2", {"name": "a)b"})"#),
            Some((Verb::Update, r#"User "38f2", {"name": "a)b"}"#.to_string()))
        );
    }

    #[test]
    fn test_rewrite_call_rejects_unknown_shapes() {
        assert_eq!(rewrite_call("User.fly()"), None);
        assert_eq!(rewrite_call("User.create()"), None);
        assert_eq!(rewrite_call("User.all"), None);
        assert_eq!(rewrite_call("User.all)("), None);
        assert_eq!(rewrite_call("no dot here"), None);
    }
}
