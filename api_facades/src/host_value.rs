//! Host Values
//!
//! Loosely typed arguments as a host runtime hands them over, plus the
//! helpers that check their kind and position before anything reaches the
//! inner layers.

use entities_memory_mapping::{ErrorCause, MmapError, MmapResult};
use usecases_memory_mapping::Mapping;

/// One argument passed by the host
#[derive(Debug, Clone, Copy)]
pub enum HostValue<'a> {
    /// Argument omitted or explicitly undefined
    Undefined,
    /// Integer number
    Integer(i64),
    /// Boolean
    Boolean(bool),
    /// String (never valid for these operations, kept for diagnostics)
    Text(&'a str),
    /// A mapped buffer previously returned by `map`
    Buffer(&'a Mapping),
}

impl HostValue<'_> {
    fn kind(&self) -> &'static str {
        match self {
            HostValue::Undefined => "undefined",
            HostValue::Integer(_) => "integer",
            HostValue::Boolean(_) => "boolean",
            HostValue::Text(_) => "string",
            HostValue::Buffer(_) => "buffer",
        }
    }
}

/// Builds the error of the calling operation's class
pub(crate) type ErrorClass = fn(ErrorCause) -> MmapError;

/// Argument reader for one facade call
pub(crate) struct Args<'s, 'a> {
    op: &'static str,
    args: &'s [HostValue<'a>],
    class: ErrorClass,
}

impl<'s, 'a> Args<'s, 'a> {
    pub(crate) fn new(op: &'static str, args: &'s [HostValue<'a>], class: ErrorClass) -> Self {
        Self { op, args, class }
    }

    pub(crate) fn len(&self) -> usize {
        self.args.len()
    }

    pub(crate) fn fail(&self, message: String) -> MmapError {
        (self.class)(ErrorCause::Argument(message))
    }

    fn get(&self, index: usize) -> HostValue<'a> {
        self.args.get(index).copied().unwrap_or(HostValue::Undefined)
    }

    fn wrong_kind(&self, index: usize, name: &str, expected: &str) -> MmapError {
        self.fail(format!(
            "{}: {} (arg[{}]) must be {}, got {}",
            self.op,
            name,
            index,
            expected,
            self.get(index).kind()
        ))
    }

    pub(crate) fn integer(&self, index: usize, name: &str) -> MmapResult<i64> {
        match self.get(index) {
            HostValue::Integer(value) => Ok(value),
            _ => Err(self.wrong_kind(index, name, "an integer")),
        }
    }

    pub(crate) fn optional_integer(&self, index: usize, name: &str) -> MmapResult<Option<i64>> {
        match self.get(index) {
            HostValue::Undefined => Ok(None),
            HostValue::Integer(value) => Ok(Some(value)),
            _ => Err(self.wrong_kind(index, name, "an integer")),
        }
    }

    pub(crate) fn optional_bool(&self, index: usize, name: &str) -> MmapResult<Option<bool>> {
        match self.get(index) {
            HostValue::Undefined => Ok(None),
            HostValue::Boolean(value) => Ok(Some(value)),
            _ => Err(self.wrong_kind(index, name, "a boolean")),
        }
    }

    pub(crate) fn buffer(&self, index: usize) -> MmapResult<&'a Mapping> {
        match self.get(index) {
            HostValue::Buffer(mapping) => Ok(mapping),
            _ => Err(self.wrong_kind(index, "buffer", "a Buffer")),
        }
    }

    /// An integer that must fit an i32 (protection, flags, fd, advice)
    pub(crate) fn int32(&self, index: usize, name: &str) -> MmapResult<i32> {
        let value = self.integer(index, name)?;
        self.narrow(index, name, value)
    }

    pub(crate) fn narrow(&self, index: usize, name: &str, value: i64) -> MmapResult<i32> {
        i32::try_from(value).map_err(|_| {
            self.fail(format!("{}: {} (arg[{}]) out of range: {}", self.op, name, index, value))
        })
    }

    /// A non-negative integer (sizes, offsets, lengths)
    pub(crate) fn unsigned(&self, index: usize, name: &str, value: i64) -> MmapResult<u64> {
        u64::try_from(value).map_err(|_| {
            self.fail(format!("{}: {} (arg[{}]) must not be negative: {}", self.op, name, index, value))
        })
    }
}
