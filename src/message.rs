//! Channel-voice messages and their wire encoding.

use crate::prelude::*;
use tracing::{debug, trace};

/// The seven MIDI channel-voice commands.
///
/// Each command occupies the high nibble of the status byte, the low nibble being the
/// 0-based channel.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Command {
    /// Stop playing a note. Data: key, release velocity.
    NoteOff,
    /// Start playing a note. Data: key, velocity.
    NoteOn,
    /// Modify the pressure on a single held key. Data: key, pressure.
    PolyPressure,
    /// Set a controller. Data: controller number, value.
    ControlChange,
    /// Select a program (instrument). Data: program, unused.
    ProgramChange,
    /// Modify the pressure of the whole channel. Data: pressure, unused.
    ChannelPressure,
    /// Bend the pitch of the whole channel. Data: LSB, MSB of a 14-bit value.
    PitchBend,
}
impl Command {
    /// Every command, in status byte order.
    pub const ALL: [Command; 7] = [
        Command::NoteOff,
        Command::NoteOn,
        Command::PolyPressure,
        Command::ControlChange,
        Command::ProgramChange,
        Command::ChannelPressure,
        Command::PitchBend,
    ];

    /// The raw high nibble of the status byte.
    #[inline]
    pub fn status_nibble(self) -> u8 {
        match self {
            Command::NoteOff => 0x8,
            Command::NoteOn => 0x9,
            Command::PolyPressure => 0xA,
            Command::ControlChange => 0xB,
            Command::ProgramChange => 0xC,
            Command::ChannelPressure => 0xD,
            Command::PitchBend => 0xE,
        }
    }

    /// The status byte for channel 1, ie. `0x80`, `0x90`, ..., `0xE0`.
    #[inline]
    pub fn status_base(self) -> u8 {
        self.status_nibble() << 4
    }

    /// Recover the command out of a status byte.
    ///
    /// Returns `None` for bytes outside of the channel-voice range `0x80 ..= 0xEF`.
    #[inline]
    pub fn from_status(status: u8) -> Option<Command> {
        Some(match status >> 4 {
            0x8 => Command::NoteOff,
            0x9 => Command::NoteOn,
            0xA => Command::PolyPressure,
            0xB => Command::ControlChange,
            0xC => Command::ProgramChange,
            0xD => Command::ChannelPressure,
            0xE => Command::PitchBend,
            _ => return None,
        })
    }

    /// How many data bytes are meaningful for this command.
    ///
    /// Messages are always sent as 3 bytes: commands with a single data byte are padded with a
    /// zero.
    #[inline]
    pub fn data_len(self) -> usize {
        match self {
            Command::ProgramChange | Command::ChannelPressure => 1,
            _ => 2,
        }
    }
}

/// A single, fully validated channel-voice message.
///
/// Encodes to exactly 3 bytes: a status byte followed by two data bytes.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct Message {
    command: Command,
    channel: Channel,
    data: [Midi7; 2],
}
impl Message {
    /// Build a message out of already validated parts.
    #[inline]
    pub fn new(command: Command, channel: Channel, data1: Midi7, data2: Midi7) -> Message {
        Message {
            command,
            channel,
            data: [data1, data2],
        }
    }

    /// Build a message out of raw data values, checking that both fit in 7 bits.
    pub fn from_ints(
        command: Command,
        channel: Channel,
        data1: i32,
        data2: i32,
    ) -> StdResult<Message, RangeError> {
        Ok(Message::new(
            command,
            channel,
            Midi7::new(data1)?,
            Midi7::new(data2)?,
        ))
    }

    /// A control change message.
    #[inline]
    pub(crate) fn control(channel: Channel, control: Midi7, value: Midi7) -> Message {
        Message::new(Command::ControlChange, channel, control, value)
    }

    #[inline]
    pub fn command(&self) -> Command {
        self.command
    }

    #[inline]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    #[inline]
    pub fn data(&self) -> [Midi7; 2] {
        self.data
    }

    /// The status byte, `status_base + (channel - 1)`.
    #[inline]
    pub fn status(&self) -> u8 {
        self.command.status_base() | self.channel.index()
    }

    /// The raw wire bytes of this message.
    #[inline]
    pub fn encode(&self) -> [u8; 3] {
        [self.status(), self.data[0].as_int(), self.data[1].as_int()]
    }

    /// Write the status byte and both data bytes to the sink, in that order.
    ///
    /// If the sink fails, the remaining bytes are not written.
    pub fn write_to<S: ByteSink + ?Sized>(
        &self,
        sink: &mut S,
        timeout: Duration,
    ) -> Result<(), S::Error> {
        let bytes = self.encode();
        trace!(
            channel = self.channel.as_int(),
            status = bytes[0],
            data1 = bytes[1],
            data2 = bytes[2],
            "sending {:?}",
            self.command
        );
        for (idx, &byte) in bytes.iter().enumerate() {
            if let Err(err) = sink.send(byte, timeout) {
                debug!(
                    channel = self.channel.as_int(),
                    status = bytes[0],
                    "sink rejected byte {} of {:?}, message truncated",
                    idx,
                    self.command
                );
                bail!(Error::Io(err));
            }
        }
        Ok(())
    }
}
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [status, data1, data2] = self.encode();
        write!(f, "{:02X} {:02X} {:02X}", status, data1, data2)
    }
}
