//! Controller numbers with a standard meaning, as used by the `Controller` convenience methods.
//!
//! Continuous controllers `0 ..= 31` carry the coarse (most significant) half of a value, and
//! controllers `32 ..= 63` carry the fine (least significant) half of the controller 32 below.

use crate::primitive::Midi7;

/// Bank select, coarse.
pub const BANK_SELECT: Midi7 = Midi7::from_int_lossy(0);
/// Modulation wheel, coarse.
pub const MODULATION: Midi7 = Midi7::from_int_lossy(1);
/// Channel volume, coarse.
pub const VOLUME: Midi7 = Midi7::from_int_lossy(7);
/// Bank select, fine.
pub const BANK_SELECT_LSB: Midi7 = Midi7::from_int_lossy(32);
/// Modulation wheel, fine.
pub const MODULATION_LSB: Midi7 = Midi7::from_int_lossy(33);
/// Channel volume, fine.
pub const VOLUME_LSB: Midi7 = Midi7::from_int_lossy(39);

/// Silence the channel immediately, including release tails.
pub const ALL_SOUND_OFF: Midi7 = Midi7::from_int_lossy(120);
pub const RESET_ALL_CONTROLLERS: Midi7 = Midi7::from_int_lossy(121);
/// Connect (`127`) or disconnect (`0`) the instrument's own keyboard from its sound engine.
pub const LOCAL_CONTROL: Midi7 = Midi7::from_int_lossy(122);
pub const ALL_NOTES_OFF: Midi7 = Midi7::from_int_lossy(123);
