//! Argument tokenizer for request argument vectors.
//!
//! The grammar is deliberately small: four structural flags, one positional
//! file path, and everything else that looks like an option is forwarded to
//! [`crate::options`] untouched. Parsing never touches the filesystem.

use prettierd_config::DEFAULT_IGNORE_PATH;

use crate::errors::UsageError;

const NO_COLOR: &str = "--no-color";
const IGNORE_PATH: &str = "--ignore-path";
const CHECK: &str = "--check";
const FORMAT: &str = "--format";

/// Fixed-shape flags recognised by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArguments {
    /// Whether `--no-color` was given.
    pub no_color: bool,
    /// Ignore file consulted for the target, relative to the working
    /// directory unless absolute.
    pub ignore_path: String,
}

impl Default for ParsedArguments {
    fn default() -> Self {
        Self {
            no_color: false,
            ignore_path: DEFAULT_IGNORE_PATH.to_owned(),
        }
    }
}

/// What the request does with the target file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Task {
    /// Return the formatted text.
    #[default]
    Format,
    /// Verify the text is already formatted.
    Check,
}

/// Result of tokenizing one argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedArguments {
    /// Structural flags.
    pub arguments: ParsedArguments,
    /// The single positional argument.
    pub target: String,
    /// Selected task; the last selector wins.
    pub task: Task,
    /// Option tokens forwarded to the decoder, in order.
    pub passthrough: Vec<String>,
}

/// Splits an argument vector into flags, the target file, and pass-through
/// option tokens.
///
/// # Errors
///
/// Returns [`UsageError::MissingValue`] when `--ignore-path` is the last
/// token, [`UsageError::MultiplePositionals`] on a second positional, and
/// [`UsageError::MissingFile`] when no positional is present.
pub fn tokenize<S: AsRef<str>>(args: &[S]) -> Result<TokenizedArguments, UsageError> {
    let mut arguments = ParsedArguments::default();
    let mut task = Task::default();
    let mut positional: Option<String> = None;
    let mut passthrough = Vec::new();

    let mut iter = args.iter().map(AsRef::as_ref);
    while let Some(token) = iter.next() {
        match token {
            NO_COLOR => arguments.no_color = true,
            IGNORE_PATH => {
                let value = iter
                    .next()
                    .ok_or(UsageError::MissingValue { flag: IGNORE_PATH })?;
                value.clone_into(&mut arguments.ignore_path);
            }
            CHECK => task = Task::Check,
            FORMAT => task = Task::Format,
            option if option.starts_with('-') => passthrough.push(option.to_owned()),
            candidate => match &positional {
                Some(first) => {
                    return Err(UsageError::MultiplePositionals {
                        first: first.clone(),
                        second: candidate.to_owned(),
                    });
                }
                None => positional = Some(candidate.to_owned()),
            },
        }
    }

    let target = positional.ok_or(UsageError::MissingFile)?;
    Ok(TokenizedArguments {
        arguments,
        target,
        task,
        passthrough,
    })
}
