//! The `Controller`, turning musical intents into channel-voice messages on a sink.

use crate::{controllers, prelude::*};
use tracing::debug;

/// The timeout used for every byte write unless one is given with
/// [`Controller::with_timeout`](struct.Controller.html#method.with_timeout).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(100);

const DEFAULT_ON_VELOCITY: i32 = 127;
const DEFAULT_OFF_VELOCITY: i32 = 0;

/// A MIDI controller: a device sending MIDI messages to an external instrument or sequencer.
///
/// A `Controller` is bound to one MIDI channel and owns the sink it writes to.
/// Every method validates its arguments, encodes one or more 3-byte messages and writes them to
/// the sink in order, each byte with the configured timeout.
///
/// # Errors
///
/// Arguments are checked before anything is written: an out-of-range value yields
/// `Error::Range` and leaves the sink untouched, even for methods sending several messages.
///
/// A sink failure yields `Error::Io` and stops immediately.
/// Bytes accepted before the failure remain written, so the receiver may be left with a
/// truncated message.
/// Nothing is retried.
///
/// # Sharing a port
///
/// Several controllers may share one physical port on different channels by borrowing it,
/// since `&mut S` is a sink whenever `S` is.
/// There is no internal locking: callers must not interleave writes from different controllers
/// within a single message.
#[derive(Debug)]
pub struct Controller<S> {
    sink: S,
    channel: Channel,
    timeout: Duration,
}
impl<S: ByteSink> Controller<S> {
    /// Create a controller on the given 1-based channel, writing with the default timeout.
    ///
    /// Fails if `channel` is not in `1 ..= 16`.
    #[inline]
    pub fn new(sink: S, channel: i32) -> StdResult<Controller<S>, RangeError> {
        Self::with_timeout(sink, channel, DEFAULT_TIMEOUT)
    }

    /// Create a controller with an explicit per-byte write timeout.
    pub fn with_timeout(
        sink: S,
        channel: i32,
        timeout: Duration,
    ) -> StdResult<Controller<S>, RangeError> {
        Ok(Controller {
            sink,
            channel: Channel::new(channel)?,
            timeout,
        })
    }

    #[inline]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Access the sink directly, for example to reset it after a timeout.
    #[inline]
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    #[inline]
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Write a pre-built message.
    ///
    /// The message is written as-is, even if it was built for another channel.
    #[inline]
    pub fn send(&mut self, msg: &Message) -> Result<(), S::Error> {
        msg.write_to(&mut self.sink, self.timeout)
    }

    /// Write several messages in order, stopping at the first failure.
    pub fn send_all(&mut self, msgs: &[Message]) -> Result<(), S::Error> {
        for msg in msgs {
            self.send(msg)?;
        }
        Ok(())
    }

    /// Send a raw channel-voice message on this controller's channel.
    ///
    /// Both data values must fit in 7 bits.
    /// Commands that carry a single data byte should pass `0` as `data2`.
    pub fn send_message(
        &mut self,
        command: Command,
        data1: i32,
        data2: i32,
    ) -> Result<(), S::Error> {
        let msg = Message::from_ints(command, self.channel, data1, data2)?;
        self.send(&msg)
    }

    /// Stop playing a note. The release velocity defaults to `0`.
    pub fn note_off(
        &mut self,
        note: i32,
        velocity: impl Into<Option<i32>>,
    ) -> Result<(), S::Error> {
        let velocity = velocity.into().unwrap_or(DEFAULT_OFF_VELOCITY);
        self.send_message(Command::NoteOff, note, velocity)
    }

    /// Start playing a note. The velocity defaults to `127`.
    pub fn note_on(
        &mut self,
        note: i32,
        velocity: impl Into<Option<i32>>,
    ) -> Result<(), S::Error> {
        let velocity = velocity.into().unwrap_or(DEFAULT_ON_VELOCITY);
        self.send_message(Command::NoteOn, note, velocity)
    }

    /// Send pressure (aftertouch).
    ///
    /// With `Some(note)` this is polyphonic pressure on that key, otherwise it is channel
    /// pressure.
    /// Note `0` is a valid key and selects polyphonic pressure like any other.
    pub fn pressure(&mut self, value: i32, note: Option<i32>) -> Result<(), S::Error> {
        match note {
            Some(note) => self.send_message(Command::PolyPressure, note, value),
            None => self.send_message(Command::ChannelPressure, value, 0),
        }
    }

    /// Set a controller, such as a pedal or a knob.
    pub fn control_change(&mut self, control: i32, value: i32) -> Result<(), S::Error> {
        self.send_message(Command::ControlChange, control, value)
    }

    /// Select a program, preceded by a bank select if `bank` is given.
    ///
    /// The 14-bit bank is sent as the fine bank select (controller 32) and then the coarse bank
    /// select (controller 0), followed by the program change itself.
    /// Receivers latch the bank when the program change arrives, so the order is fixed.
    pub fn program_change(&mut self, value: i32, bank: Option<i32>) -> Result<(), S::Error> {
        let program = Message::from_ints(Command::ProgramChange, self.channel, value, 0)?;
        match bank {
            Some(bank) => {
                let (msb, lsb) = Midi14::new(bank)?.split()?;
                self.send_all(&[
                    Message::control(self.channel, controllers::BANK_SELECT_LSB, lsb),
                    Message::control(self.channel, controllers::BANK_SELECT, msb),
                    program,
                ])
            }
            None => self.send(&program),
        }
    }

    /// Bend the pitch of the channel. `None` centers it at `0x2000`.
    ///
    /// The 14-bit value is sent least significant half first.
    pub fn pitch_bend(&mut self, value: impl Into<Option<i32>>) -> Result<(), S::Error> {
        let bend = match value.into() {
            Some(value) => Midi14::new(value)?,
            None => Midi14::CENTER,
        };
        let (msb, lsb) = bend.split()?;
        self.send(&Message::new(Command::PitchBend, self.channel, lsb, msb))
    }

    /// Set the modulation wheel.
    ///
    /// Coarse values are 7 bits wide.
    /// With `fine`, `value` is 14 bits wide and sent as the fine controller (33) followed by
    /// the coarse one (1).
    pub fn modulation(&mut self, value: i32, fine: bool) -> Result<(), S::Error> {
        self.paired_control(
            controllers::MODULATION,
            controllers::MODULATION_LSB,
            value,
            fine,
        )
    }

    /// Set the channel volume.
    ///
    /// Coarse values are 7 bits wide.
    /// With `fine`, `value` is 14 bits wide and sent as the fine controller (39) followed by
    /// the coarse one (7).
    pub fn volume(&mut self, value: i32, fine: bool) -> Result<(), S::Error> {
        self.paired_control(controllers::VOLUME, controllers::VOLUME_LSB, value, fine)
    }

    fn paired_control(
        &mut self,
        coarse: Midi7,
        fine_lsb: Midi7,
        value: i32,
        fine: bool,
    ) -> Result<(), S::Error> {
        if fine {
            let (msb, lsb) = Midi14::new(value)?.split()?;
            self.send_all(&[
                Message::control(self.channel, fine_lsb, lsb),
                Message::control(self.channel, coarse, msb),
            ])
        } else {
            let value = Midi7::new(value)?;
            self.send(&Message::control(self.channel, coarse, value))
        }
    }

    /// Silence every sound on the channel, including release tails.
    pub fn all_sound_off(&mut self) -> Result<(), S::Error> {
        self.mode_message(controllers::ALL_SOUND_OFF, 0)
    }

    /// Set every controller back to its default value.
    pub fn reset_all_controllers(&mut self) -> Result<(), S::Error> {
        self.mode_message(controllers::RESET_ALL_CONTROLLERS, 0)
    }

    /// Enable or disable local control.
    pub fn local_control(&mut self, enabled: bool) -> Result<(), S::Error> {
        self.mode_message(controllers::LOCAL_CONTROL, if enabled { 127 } else { 0 })
    }

    /// Release every note playing on the channel.
    pub fn all_notes_off(&mut self) -> Result<(), S::Error> {
        self.mode_message(controllers::ALL_NOTES_OFF, 0)
    }

    fn mode_message(&mut self, control: Midi7, value: u8) -> Result<(), S::Error> {
        let msg = Message::control(self.channel, control, Midi7::from_int_lossy(value));
        self.send(&msg)
    }

    /// Reset everything and stop making noise.
    ///
    /// Sends all-sound-off, reset-all-controllers and all-notes-off, in that order, stopping at
    /// the first failure.
    /// See [`panic_best_effort`](#method.panic_best_effort) to keep going after a failure.
    pub fn panic(&mut self) -> Result<(), S::Error> {
        self.all_sound_off()?;
        self.reset_all_controllers()?;
        self.all_notes_off()
    }

    /// Like [`panic`](#method.panic), but attempts all three messages even if some fail.
    ///
    /// Returns the first error, if any.
    pub fn panic_best_effort(&mut self) -> Result<(), S::Error> {
        let steps: [fn(&mut Self) -> Result<(), S::Error>; 3] = [
            Self::all_sound_off,
            Self::reset_all_controllers,
            Self::all_notes_off,
        ];
        let mut first_err = None;
        for (idx, step) in steps.iter().enumerate() {
            if let Err(err) = step(self) {
                debug!(
                    channel = self.channel.as_int(),
                    "panic step {} failed, continuing",
                    idx
                );
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
