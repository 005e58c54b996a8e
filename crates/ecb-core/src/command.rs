//! Client requests
//!
//! A [`Command`] is built per request and dropped after dispatch. It can be
//! parsed from an argument vector, a whitespace-separated line with
//! double-quote grouping, or a JSON object:
//!
//! ```text
//! set_property root/cam Camera fieldOfView 75
//! create_object "Main Camera" root --components=Camera,Transform
//! {"name": "find", "args": ["Player"], "options": {"by": "tag"}}
//! ```

use crate::error::BridgeError;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

/// One named operation request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    name: String,
    args: Vec<String>,
    options: IndexMap<String, String>,
}

#[derive(Deserialize)]
struct JsonCommand {
    name: String,
    #[serde(default)]
    args: Vec<Value>,
    #[serde(default)]
    options: IndexMap<String, Value>,
}

fn scalar_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl Command {
    /// Create command with no arguments
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append positional argument
    #[inline]
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set keyed option
    #[inline]
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Build from `name` followed by raw tokens
    ///
    /// `--key=value` becomes an option, `--flag` means `--flag=true`, and
    /// every other token is positional.
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self, BridgeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = tokens.into_iter().map(Into::into);
        let name = tokens
            .next()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| BridgeError::invalid_argument("empty request"))?;

        let mut command = Self::new(name);
        for token in tokens {
            match token.strip_prefix("--").filter(|rest| !rest.is_empty()) {
                Some(rest) => {
                    let (key, value) = rest.split_once('=').unwrap_or((rest, "true"));
                    command.options.insert(key.to_string(), value.to_string());
                }
                None => command.args.push(token),
            }
        }
        Ok(command)
    }

    /// Parse one request line, JSON object or plain tokens
    pub fn parse_line(line: &str) -> Result<Self, BridgeError> {
        let line = line.trim();
        if line.starts_with('{') {
            let raw: JsonCommand = serde_json::from_str(line)
                .map_err(|e| BridgeError::invalid_argument(format!("malformed JSON request: {e}")))?;
            if raw.name.is_empty() {
                return Err(BridgeError::invalid_argument("empty request"));
            }
            return Ok(Self {
                name: raw.name,
                args: raw.args.into_iter().map(scalar_to_string).collect(),
                options: raw
                    .options
                    .into_iter()
                    .map(|(k, v)| (k, scalar_to_string(v)))
                    .collect(),
            });
        }
        Self::from_tokens(split_tokens(line)?)
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    #[inline]
    #[must_use]
    pub fn options(&self) -> &IndexMap<String, String> {
        &self.options
    }

    /// Positional argument, if present
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Positional argument or an invalid-argument error naming it
    pub fn require(&self, index: usize, what: &str) -> Result<&str, BridgeError> {
        self.get(index).ok_or_else(|| {
            BridgeError::invalid_argument(format!("{}: missing argument {} <{what}>", self.name, index + 1))
        })
    }

    /// Keyed option, if present
    #[inline]
    #[must_use]
    pub fn get_option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Parse an option with `FromStr`
    pub fn parse_option<T>(&self, key: &str) -> Result<Option<T>, BridgeError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_option(key)
            .map(|raw| {
                raw.parse().map_err(|e| {
                    BridgeError::invalid_argument(format!("{}: option --{key}={raw}: {e}", self.name))
                })
            })
            .transpose()
    }

    /// Boolean option; absent means `false`
    pub fn flag(&self, key: &str) -> Result<bool, BridgeError> {
        match self.get_option(key) {
            None => Ok(false),
            Some(raw) => match ecb_reflect::coerce(raw, &ecb_scene::ValueType::Bool) {
                Some(ecb_scene::PropertyValue::Bool(v)) => Ok(v),
                _ => Err(BridgeError::invalid_argument(format!(
                    "{}: option --{key} expects a boolean, got '{raw}'",
                    self.name
                ))),
            },
        }
    }
}

/// Split on whitespace, keeping double-quoted groups together
fn split_tokens(line: &str) -> Result<Vec<String>, BridgeError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut pending = false;

    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                pending = true;
            }
            '\\' if in_quotes => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            c if c.is_whitespace() && !in_quotes => {
                if pending || !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => current.push(c),
        }
    }
    if in_quotes {
        return Err(BridgeError::invalid_argument("unterminated quote in request"));
    }
    if pending || !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        for (key, value) in &self.options {
            write!(f, " --{key}={value}")?;
        }
        Ok(())
    }
}
