//! # Overview
//!
//! `midictl` turns musical intents (note on/off, pressure, control change, program change,
//! pitch bend) into the exact 3-byte MIDI channel-voice messages a synthesizer expects, and
//! writes them one byte at a time to a serial-like [`ByteSink`](io/trait.ByteSink.html).
//!
//! It is meant for microcontrollers acting as MIDI controllers: a UART or USB virtual COM port
//! is wrapped in a `ByteSink`, handed to a [`Controller`](struct.Controller.html) together with
//! a MIDI channel, and the controller does the rest.
//!
//! ```rust
//! # #[cfg(feature = "alloc")] {
//! use midictl::Controller;
//!
//! // Any `ByteSink` works, a `Vec<u8>` just records the bytes.
//! let mut synth = Controller::new(Vec::<u8>::new(), 1).unwrap();
//! synth.note_on(65, None).unwrap();
//! synth.note_off(65, None).unwrap();
//!
//! assert_eq!(synth.sink(), &[0x90, 65, 127, 0x80, 65, 0]);
//! # }
//! ```
//!
//! # Validation
//!
//! MIDI data bytes are 7-bit values, channels are numbered 1 to 16 and some values (pitch
//! bend, bank numbers, fine controllers) are 14 bits wide and travel as two data bytes.
//! Every argument is range-checked through [`Midi7`](num/struct.Midi7.html),
//! [`Midi14`](num/struct.Midi14.html) and [`Channel`](num/struct.Channel.html) before a single
//! byte is written, so an out-of-range value yields a
//! [`RangeError`](struct.RangeError.html) and never reaches the wire.
//!
//! Sink failures (for example a write timeout) are reported as
//! [`Error::Io`](enum.Error.html#variant.Io).
//! Bytes that were already accepted by the sink stay written, so the receiver may see a
//! truncated message and should be resynchronized by the caller.
//!
//! # About features
//!
//! - The `std` feature (enabled by default)
//!
//!   Adds [`io::IoWrap`](io/struct.IoWrap.html), a sink over any `std::io::Write`, and makes
//!   the error types implement `std::error::Error`.
//!   Disabling default features makes the crate `no_std`.
//!
//! - The `alloc` feature (enabled by default, implied by `std`)
//!
//!   Makes `Vec<u8>` usable as a recording sink.
//!
//! # Logging
//!
//! Every message written and every sink failure is reported as a `tracing` event at `trace`
//! and `debug` level respectively.
//! The crate never installs a subscriber, so nothing is emitted unless the application does.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

macro_rules! bail {
    ($err:expr) => {{
        return Err($err.into());
    }};
}
macro_rules! ensure {
    ($cond:expr, $err:expr) => {{
        if !$cond {
            bail!($err)
        }
    }};
}

/// All of the errors this crate produces.
mod error;

mod prelude {
    pub(crate) use crate::{
        error::{Error, Field, RangeError, Result, StdResult},
        io::ByteSink,
        message::{Command, Message},
        primitive::{Channel, Midi14, Midi7},
    };
    #[cfg(feature = "alloc")]
    pub(crate) use alloc::vec::Vec;
    pub(crate) use core::{convert::TryFrom, fmt, ops::RangeInclusive, time::Duration};
    #[cfg(feature = "std")]
    pub(crate) use std::io;
}

pub mod controllers;
mod controller;
pub mod io;
mod message;
mod primitive;

pub use crate::{
    controller::{Controller, DEFAULT_TIMEOUT},
    error::{Error, Field, RangeError, Result},
    io::ByteSink,
    message::{Command, Message},
};

/// Range-checked integers used by the MIDI standard.
pub mod num {
    pub use crate::primitive::{Channel, Midi14, Midi7};
}

#[cfg(all(test, feature = "std"))]
mod test;
