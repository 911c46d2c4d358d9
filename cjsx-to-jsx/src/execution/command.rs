use super::BackendError;
use std::fmt;

/// A program and its arguments, rendered for the shell and for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// The program.
    pub program: String,
    /// The arguments.
    pub args: Vec<String>,
}

impl CommandLine {
    /// Creates a command line.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Renders the command as one string the platform shell splits back
    /// into exactly these words.
    ///
    /// Words are quoted with POSIX rules (`cmd` rules on Windows), so `$`,
    /// backticks, `;` and quotes reach the program literally.
    ///
    /// # Errors
    ///
    /// Returns `Misconfigured` when a word cannot be quoted, e.g. it holds a
    /// NUL byte.
    pub fn render(&self) -> Result<String, BackendError> {
        let mut words = Vec::with_capacity(self.args.len() + 1);
        for word in std::iter::once(&self.program).chain(&self.args) {
            words.push(quote(word).ok_or_else(|| {
                BackendError::Misconfigured(format!(
                    "{}: argument {word:?} cannot be passed through a shell",
                    self.program
                ))
            })?);
        }
        Ok(words.join(" "))
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Ok(rendered) => f.write_str(&rendered),
            Err(_) => write!(f, "{} {:?}", self.program, self.args),
        }
    }
}

#[cfg(not(windows))]
fn quote(word: &str) -> Option<String> {
    shlex::try_quote(word).ok().map(|quoted| quoted.into_owned())
}

#[cfg(windows)]
fn quote(word: &str) -> Option<String> {
    if word.contains('\0') {
        return None;
    }
    if !word.is_empty() && !word.chars().any(|c| c.is_whitespace() || c == '"') {
        return Some(word.to_string());
    }
    let escaped = word.replace('\\', "\\\\").replace('"', "\\\"");
    Some(format!("\"{escaped}\""))
}
