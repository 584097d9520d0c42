use crate::prelude::*;
use thiserror::Error;

/// The kind of value that failed a range check.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Field {
    /// A 7-bit data byte: a key, a velocity, a controller number or value, a program, etc.
    DataByte,
    /// A 14-bit value, before being split into two data bytes.
    Value14,
    /// A 1-based MIDI channel.
    Channel,
}
impl fmt::Display for Field {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Field::DataByte => "midi data byte",
            Field::Value14 => "14-bit midi value",
            Field::Channel => "midi channel",
        })
    }
}

/// A value outside of its legal range was supplied.
///
/// Range errors are raised while validating arguments, before anything is written to the sink.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
#[error("invalid {} {}, expected {}..={}", .field, .given, .allowed.start(), .allowed.end())]
pub struct RangeError {
    field: Field,
    given: i32,
    allowed: RangeInclusive<i32>,
}
impl RangeError {
    #[inline]
    pub(crate) fn new(field: Field, given: i32, allowed: RangeInclusive<i32>) -> RangeError {
        RangeError {
            field,
            given,
            allowed,
        }
    }

    /// What kind of value was rejected.
    #[inline]
    pub fn field(&self) -> Field {
        self.field
    }

    /// The rejected value, as given by the caller.
    #[inline]
    pub fn given(&self) -> i32 {
        self.given
    }

    /// The inclusive range the value should have been in.
    #[inline]
    pub fn allowed(&self) -> RangeInclusive<i32> {
        self.allowed.clone()
    }
}

/// Represents a failure while sending a MIDI message.
///
/// `E` is the error type of the [`ByteSink`](io/trait.ByteSink.html) the message was being
/// written to.
#[derive(Debug, Error)]
pub enum Error<E> {
    /// An argument was out of range. Nothing was written to the sink.
    #[error(transparent)]
    Range(#[from] RangeError),
    /// The sink failed to accept a byte, usually because of a timeout.
    ///
    /// Any bytes of the message written before the failure remain written.
    #[error("midi sink rejected a byte: {0}")]
    Io(E),
}
impl<E> Error<E> {
    /// The range error, if this error was caused by an invalid argument.
    #[inline]
    pub fn as_range(&self) -> Option<&RangeError> {
        match self {
            Error::Range(err) => Some(err),
            Error::Io(_) => None,
        }
    }

    /// The sink error, if this error was caused by a failed write.
    #[inline]
    pub fn as_io(&self) -> Option<&E> {
        match self {
            Error::Range(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

/// The result type used when sending MIDI messages through a sink with error type `E`.
pub type Result<T, E> = StdResult<T, Error<E>>;
pub(crate) use core::result::Result as StdResult;
