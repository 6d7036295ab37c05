//! Messages exchanged over the method channel

use std::collections::HashMap;

/// A loosely typed argument value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Int(i64),
    Str(String),
    Null,
}

impl From<i64> for Argument {
    fn from(value: i64) -> Self {
        Argument::Int(value)
    }
}

impl From<i32> for Argument {
    fn from(value: i32) -> Self {
        Argument::Int(value as i64)
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Argument::Str(value.to_string())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Argument::Str(value)
    }
}

/// A named call with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub arguments: HashMap<String, Argument>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        MethodCall {
            method: method.into(),
            arguments: HashMap::new(),
        }
    }

    /// Adds an argument, replacing any previous value under `name`
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Argument>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Argument> {
        self.arguments.get(name)
    }
}

/// The single reply to a `MethodCall`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodReply {
    /// Raw RGBA bytes of the decoded region
    Success(Vec<u8>),
    Error {
        code: String,
        message: String,
        details: Option<String>,
    },
    /// The method name is not known to the channel
    NotImplemented,
}

impl MethodReply {
    pub fn error(code: &str, message: impl Into<String>, details: Option<String>) -> Self {
        MethodReply::Error {
            code: code.to_string(),
            message: message.into(),
            details,
        }
    }

    /// Error code of the reply, if it is an error
    pub fn error_code(&self) -> Option<&str> {
        match self {
            MethodReply::Error { code, .. } => Some(code),
            _ => None,
        }
    }
}
