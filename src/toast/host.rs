// Calling convention for hosts that dispatch commands by name

use thiserror::Error;

use super::constants::ConstantTable;

/// An argument as the host runtime passes it
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Number(f64),
    Text(String),
    /// Anything the calling convention has no slot for (arrays, objects, nil...)
    Other,
}

impl From<f64> for HostValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for HostValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Debug)]
pub enum HostReply {
    /// show* commands are fire-and-forget
    Unit,
    Constants(&'static ConstantTable),
}

/// The host called something the module cannot route. show* never produces these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvokeError {
    #[error("no method named `{0}`")]
    UnknownMethod(String),

    #[error("`{method}` takes {expected} arguments, got {got}")]
    Arity {
        method: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("argument {index} of `{method}` must be a {expected}")]
    ArgumentType {
        method: &'static str,
        index: usize,
        expected: &'static str,
    },
}

pub(crate) fn expect_arity(
    method: &'static str,
    args: &[HostValue],
    expected: usize,
) -> Result<(), InvokeError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(InvokeError::Arity { method, expected, got: args.len() })
    }
}

pub(crate) fn text_arg<'a>(
    method: &'static str,
    args: &'a [HostValue],
    index: usize,
) -> Result<&'a str, InvokeError> {
    match args.get(index) {
        Some(HostValue::Text(text)) => Ok(text.as_str()),
        _ => Err(InvokeError::ArgumentType { method, index, expected: "string" }),
    }
}

pub(crate) fn number_arg(
    method: &'static str,
    args: &[HostValue],
    index: usize,
) -> Result<f64, InvokeError> {
    match args.get(index) {
        Some(HostValue::Number(value)) => Ok(*value),
        _ => Err(InvokeError::ArgumentType { method, index, expected: "number" }),
    }
}
