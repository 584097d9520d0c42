//! Range-checked building blocks for MIDI data.
//! No partially valid instance of these types can exist: values are checked on construction
//! and immutable afterwards.

use crate::prelude::*;

/// Conversions shared by the single-byte checked integers.
macro_rules! checked_int_impls {
    ($name:ident) => {
        impl TryFrom<i32> for $name {
            type Error = RangeError;
            #[inline]
            fn try_from(raw: i32) -> StdResult<$name, RangeError> {
                $name::new(raw)
            }
        }
        impl From<$name> for u8 {
            #[inline]
            fn from(checked: $name) -> u8 {
                checked.0
            }
        }
        impl PartialEq<u8> for $name {
            fn eq(&self, rhs: &u8) -> bool {
                self.0 == *rhs
            }
        }
        impl PartialEq<$name> for u8 {
            fn eq(&self, rhs: &$name) -> bool {
                *self == rhs.0
            }
        }
        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

/// A 7-bit MIDI data byte, in the range `0 ..= 127`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
#[repr(transparent)]
pub struct Midi7(u8);
impl Midi7 {
    /// The smallest data byte.
    pub const MIN: i32 = 0;
    /// The largest data byte.
    pub const MAX: i32 = 0x7F;

    /// Validate a data byte, failing if it does not fit in 7 bits.
    #[inline]
    pub fn new(value: i32) -> StdResult<Midi7, RangeError> {
        ensure!(
            (Self::MIN..=Self::MAX).contains(&value),
            RangeError::new(Field::DataByte, value, Self::MIN..=Self::MAX)
        );
        Ok(Midi7(value as u8))
    }

    /// Creates a data byte by masking off the top bit.
    #[inline]
    pub const fn from_int_lossy(raw: u8) -> Midi7 {
        Midi7(raw & 0x7F)
    }

    /// The maximum value of `127`.
    #[inline]
    pub const fn max_value() -> Midi7 {
        Midi7(0x7F)
    }

    /// Get the inner byte out of the wrapper.
    /// The top bit is guaranteed to be zero.
    #[inline]
    pub const fn as_int(self) -> u8 {
        self.0
    }
}
checked_int_impls!(Midi7);

/// A 14-bit MIDI value, split into its most and least significant 7-bit halves.
///
/// The accepted input range is `0 ..= 16384`.
/// Note that `16384` is one past the largest value that fits in 14 bits: it is accepted here,
/// but its most significant half (`128`) is not a valid data byte, so [`split`](#method.split)
/// and anything that puts it on the wire fail with a `RangeError`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
pub struct Midi14 {
    msb: u8,
    lsb: u8,
}
impl Midi14 {
    /// The smallest accepted value.
    pub const MIN: i32 = 0;
    /// The largest accepted value.
    pub const MAX: i32 = 1 << 14;
    /// The value `0x2000`, centered pitch bend.
    pub const CENTER: Midi14 = Midi14 { msb: 0x40, lsb: 0 };

    /// Validate a 14-bit value and split it into `value / 128` and `value % 128`.
    #[inline]
    pub fn new(value: i32) -> StdResult<Midi14, RangeError> {
        ensure!(
            (Self::MIN..=Self::MAX).contains(&value),
            RangeError::new(Field::Value14, value, Self::MIN..=Self::MAX)
        );
        Ok(Midi14 {
            msb: (value / 128) as u8,
            lsb: (value % 128) as u8,
        })
    }

    /// The most significant 7 bits (`value / 128`).
    #[inline]
    pub fn msb(self) -> u8 {
        self.msb
    }

    /// The least significant 7 bits (`value % 128`).
    #[inline]
    pub fn lsb(self) -> u8 {
        self.lsb
    }

    /// The value this was built from, `msb * 128 + lsb`.
    #[inline]
    pub fn value(self) -> u16 {
        (self.msb as u16) << 7 | self.lsb as u16
    }

    /// Both halves as data bytes, `(msb, lsb)`.
    ///
    /// Fails only for the value `16384`, whose most significant half does not fit in 7 bits.
    #[inline]
    pub fn split(self) -> StdResult<(Midi7, Midi7), RangeError> {
        Ok((
            Midi7::new(self.msb as i32)?,
            Midi7::from_int_lossy(self.lsb),
        ))
    }
}
impl TryFrom<i32> for Midi14 {
    type Error = RangeError;
    #[inline]
    fn try_from(raw: i32) -> StdResult<Midi14, RangeError> {
        Midi14::new(raw)
    }
}
impl fmt::Display for Midi14 {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.value(), f)
    }
}

/// A MIDI channel, numbered `1 ..= 16` the way musicians and device panels count them.
///
/// On the wire the channel occupies the low nibble of the status byte as `0 ..= 15`, see
/// [`index`](#method.index).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(transparent)]
pub struct Channel(u8);
impl Channel {
    /// The first channel.
    pub const MIN: i32 = 1;
    /// The last channel.
    pub const MAX: i32 = 16;

    /// Validate a 1-based channel number.
    #[inline]
    pub fn new(channel: i32) -> StdResult<Channel, RangeError> {
        ensure!(
            (Self::MIN..=Self::MAX).contains(&channel),
            RangeError::new(Field::Channel, channel, Self::MIN..=Self::MAX)
        );
        Ok(Channel(channel as u8))
    }

    /// The 1-based channel number.
    #[inline]
    pub const fn as_int(self) -> u8 {
        self.0
    }

    /// The 0-based channel nibble that goes into the status byte.
    #[inline]
    pub const fn index(self) -> u8 {
        self.0 - 1
    }
}
impl Default for Channel {
    #[inline]
    fn default() -> Channel {
        Channel(1)
    }
}
checked_int_impls!(Channel);
