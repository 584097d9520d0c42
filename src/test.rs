use crate::{
    io::{Cursor, CursorError, IoWrap},
    num::{Channel, Midi14, Midi7},
    ByteSink, Command, Controller, Error, Field, Message, DEFAULT_TIMEOUT,
};
use proptest::prelude::*;
use std::time::Duration;

/// Install a subscriber once so the tracing events in the write path are exercised.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn recorder(channel: i32) -> Controller<Vec<u8>> {
    init_logging();
    Controller::new(Vec::<u8>::new(), channel).unwrap()
}

/// A sink that times out on selected byte attempts, recording everything it accepts.
#[derive(Default)]
struct FlakySink {
    written: Vec<u8>,
    fail_on: Vec<usize>,
    attempts: usize,
    timeouts: Vec<Duration>,
}
impl FlakySink {
    fn failing_on(fail_on: &[usize]) -> FlakySink {
        FlakySink {
            fail_on: fail_on.to_vec(),
            ..FlakySink::default()
        }
    }
}
impl ByteSink for FlakySink {
    type Error = &'static str;
    fn send(&mut self, byte: u8, timeout: Duration) -> Result<(), &'static str> {
        let attempt = self.attempts;
        self.attempts += 1;
        self.timeouts.push(timeout);
        if self.fail_on.contains(&attempt) {
            return Err("write timed out");
        }
        self.written.push(byte);
        Ok(())
    }
}

fn flaky(fail_on: &[usize]) -> Controller<FlakySink> {
    init_logging();
    Controller::new(FlakySink::failing_on(fail_on), 1).unwrap()
}

mod values {
    use super::*;

    #[test]
    fn midi7_boundaries() {
        assert_eq!(Midi7::new(0).unwrap().as_int(), 0);
        assert_eq!(Midi7::new(127).unwrap().as_int(), 127);
        assert!(Midi7::new(-1).is_err());
        assert!(Midi7::new(128).is_err());
        assert_eq!(Midi7::max_value(), 127u8);
    }

    #[test]
    fn midi7_error_reports_value_and_range() {
        let err = Midi7::new(128).unwrap_err();
        assert_eq!(err.field(), Field::DataByte);
        assert_eq!(err.given(), 128);
        assert_eq!(err.allowed(), 0..=127);
        assert_eq!(
            err.to_string(),
            "invalid midi data byte 128, expected 0..=127"
        );
    }

    #[test]
    fn midi14_boundaries() {
        let low = Midi14::new(0).unwrap();
        assert_eq!((low.msb(), low.lsb()), (0, 0));
        let high = Midi14::new(16383).unwrap();
        assert_eq!((high.msb(), high.lsb()), (127, 127));
        assert!(Midi14::new(-1).is_err());
        assert!(Midi14::new(16385).is_err());
        assert_eq!(Midi14::new(300).unwrap().value(), 300);
        assert_eq!(Midi14::new(0x2000).unwrap(), Midi14::CENTER);
    }

    #[test]
    fn midi14_accepts_one_past_14_bits_but_cannot_split_it() {
        let edge = Midi14::new(16384).unwrap();
        assert_eq!((edge.msb(), edge.lsb()), (128, 0));
        let err = edge.split().unwrap_err();
        assert_eq!(err.field(), Field::DataByte);
        assert_eq!(err.given(), 128);
    }

    #[test]
    fn channel_boundaries() {
        for bad in &[0, 17, -1] {
            let err = Channel::new(*bad).unwrap_err();
            assert_eq!(err.field(), Field::Channel);
            assert_eq!(err.allowed(), 1..=16);
        }
        assert_eq!(Channel::new(1).unwrap().index(), 0);
        assert_eq!(Channel::new(16).unwrap().index(), 15);
        assert_eq!(Channel::default().as_int(), 1);
    }

    proptest! {
        #[test]
        fn midi7_accepts_exactly_7_bits(v in -1024i32..1024) {
            match Midi7::new(v) {
                Ok(byte) => {
                    prop_assert!((0..=127).contains(&v));
                    prop_assert_eq!(byte.as_int() as i32, v);
                }
                Err(err) => {
                    prop_assert!(!(0..=127).contains(&v));
                    prop_assert_eq!(err.given(), v);
                }
            }
        }

        #[test]
        fn midi7_rejects_wide_ints(v in any::<i32>()) {
            prop_assert_eq!(Midi7::new(v).is_ok(), (0..=127).contains(&v));
        }

        #[test]
        fn midi14_splits_losslessly(v in 0i32..=16384) {
            let split = Midi14::new(v).unwrap();
            prop_assert_eq!(split.msb() as i32 * 128 + split.lsb() as i32, v);
            prop_assert!(split.lsb() <= 127);
            prop_assert!(split.msb() <= 128);
            if v < 16384 {
                prop_assert!(split.msb() <= 127);
            }
        }
    }
}

mod messages {
    use super::*;

    #[test]
    fn status_bytes() {
        let bases: Vec<u8> = Command::ALL.iter().map(|cmd| cmd.status_base()).collect();
        assert_eq!(bases, vec![0x80, 0x90, 0xA0, 0xB0, 0xC0, 0xD0, 0xE0]);
        for cmd in Command::ALL.iter() {
            for status in cmd.status_base()..=cmd.status_base() | 0x0F {
                assert_eq!(Command::from_status(status), Some(*cmd));
            }
        }
        assert_eq!(Command::from_status(0x7F), None);
        assert_eq!(Command::from_status(0xF0), None);
        assert_eq!(Command::ProgramChange.data_len(), 1);
        assert_eq!(Command::ChannelPressure.data_len(), 1);
        assert_eq!(Command::PitchBend.data_len(), 2);
    }

    #[test]
    fn encode() {
        let channel = Channel::new(10).unwrap();
        let msg = Message::from_ints(Command::ControlChange, channel, 74, 64).unwrap();
        assert_eq!(msg.encode(), [0xB9, 74, 64]);
        assert_eq!(msg.status(), 0xB9);
        assert_eq!(msg.command(), Command::ControlChange);
        assert_eq!(msg.channel(), channel);
        assert_eq!(msg.to_string(), "B9 4A 40");
    }

    #[test]
    fn invalid_data_is_rejected() {
        let channel = Channel::default();
        assert!(Message::from_ints(Command::NoteOn, channel, 128, 0).is_err());
        assert!(Message::from_ints(Command::NoteOn, channel, 0, -1).is_err());
    }
}

mod controller {
    use super::*;

    #[test]
    fn construction() {
        assert!(Controller::new(Vec::<u8>::new(), 0).is_err());
        assert!(Controller::new(Vec::<u8>::new(), 17).is_err());
        assert!(Controller::new(Vec::<u8>::new(), 1).is_ok());
        let ctl = Controller::new(Vec::<u8>::new(), 16).unwrap();
        assert_eq!(ctl.channel().as_int(), 16);
        assert_eq!(ctl.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_millis(100));
    }

    #[test]
    fn note_on_every_channel_and_key() {
        for channel in 1..=16 {
            for note in 0..=127 {
                let mut ctl = recorder(channel);
                ctl.note_on(note, None).unwrap();
                assert_eq!(
                    ctl.into_sink(),
                    vec![0x90 + (channel as u8 - 1), note as u8, 127]
                );
            }
        }
    }

    #[test]
    fn notes() {
        let mut ctl = recorder(1);
        ctl.note_off(60, None).unwrap();
        ctl.note_on(61, 90).unwrap();
        ctl.note_off(61, 20).unwrap();
        assert_eq!(
            ctl.sink(),
            &[0x80, 60, 0, 0x90, 61, 90, 0x80, 61, 20]
        );
    }

    #[test]
    fn send_message_validates_before_writing() {
        let mut ctl = recorder(16);
        let err = ctl.send_message(Command::NoteOn, 60, 128).unwrap_err();
        assert_eq!(err.as_range().map(|e| e.given()), Some(128));
        assert!(ctl.sink().is_empty());
        ctl.send_message(Command::NoteOn, 60, 100).unwrap();
        assert_eq!(ctl.sink(), &[0x9F, 60, 100]);
    }

    #[test]
    fn pressure() {
        let mut ctl = recorder(1);
        ctl.pressure(64, None).unwrap();
        ctl.pressure(64, Some(0)).unwrap();
        ctl.pressure(10, Some(60)).unwrap();
        assert_eq!(
            ctl.sink(),
            &[0xD0, 64, 0, 0xA0, 0, 64, 0xA0, 60, 10]
        );
    }

    #[test]
    fn control_change() {
        let mut ctl = recorder(3);
        ctl.control_change(64, 127).unwrap();
        assert_eq!(ctl.sink(), &[0xB2, 64, 127]);
        assert!(ctl.control_change(128, 0).is_err());
        assert_eq!(ctl.sink().len(), 3);
    }

    #[test]
    fn program_change() {
        let mut ctl = recorder(1);
        ctl.program_change(5, None).unwrap();
        assert_eq!(ctl.sink(), &[0xC0, 5, 0]);

        let mut ctl = recorder(1);
        ctl.program_change(5, Some(300)).unwrap();
        assert_eq!(
            ctl.sink(),
            &[0xB0, 32, 44, 0xB0, 0, 2, 0xC0, 5, 0]
        );
    }

    #[test]
    fn program_change_bank_zero_is_sent() {
        let mut ctl = recorder(2);
        ctl.program_change(0, Some(0)).unwrap();
        assert_eq!(ctl.sink(), &[0xB1, 32, 0, 0xB1, 0, 0, 0xC1, 0, 0]);
    }

    #[test]
    fn program_change_rejects_before_selecting_bank() {
        let mut ctl = recorder(1);
        assert!(ctl.program_change(128, Some(1)).is_err());
        assert!(ctl.program_change(1, Some(16385)).is_err());
        assert!(ctl.program_change(1, Some(16384)).is_err());
        assert!(ctl.sink().is_empty());
    }

    #[test]
    fn pitch_bend() {
        let mut ctl = recorder(1);
        ctl.pitch_bend(0x2000).unwrap();
        ctl.pitch_bend(None).unwrap();
        ctl.pitch_bend(0).unwrap();
        ctl.pitch_bend(16383).unwrap();
        assert_eq!(
            ctl.sink(),
            &[0xE0, 0, 64, 0xE0, 0, 64, 0xE0, 0, 0, 0xE0, 127, 127]
        );
    }

    #[test]
    fn pitch_bend_out_of_range() {
        let mut ctl = recorder(1);
        assert!(ctl.pitch_bend(-1).is_err());
        assert!(ctl.pitch_bend(16384).is_err());
        assert!(ctl.sink().is_empty());
    }

    #[test]
    fn modulation_and_volume() {
        let mut ctl = recorder(1);
        ctl.modulation(100, false).unwrap();
        ctl.modulation(300, true).unwrap();
        ctl.volume(90, false).unwrap();
        ctl.volume(16383, true).unwrap();
        assert_eq!(
            ctl.sink(),
            &[
                0xB0, 1, 100, //
                0xB0, 33, 44, 0xB0, 1, 2, //
                0xB0, 7, 90, //
                0xB0, 39, 127, 0xB0, 7, 127,
            ]
        );
        assert!(ctl.volume(128, false).is_err());
        assert!(ctl.modulation(16384, true).is_err());
        assert_eq!(ctl.sink().len(), 18);
    }

    #[test]
    fn channel_mode_messages() {
        let mut ctl = recorder(1);
        ctl.all_sound_off().unwrap();
        ctl.reset_all_controllers().unwrap();
        ctl.local_control(true).unwrap();
        ctl.local_control(false).unwrap();
        ctl.all_notes_off().unwrap();
        assert_eq!(
            ctl.sink(),
            &[0xB0, 120, 0, 0xB0, 121, 0, 0xB0, 122, 127, 0xB0, 122, 0, 0xB0, 123, 0]
        );
    }

    #[test]
    fn panic() {
        let mut ctl = recorder(4);
        ctl.panic().unwrap();
        assert_eq!(
            ctl.sink(),
            &[0xB3, 120, 0, 0xB3, 121, 0, 0xB3, 123, 0]
        );
    }

    #[test]
    fn panic_stops_at_first_failure() {
        let mut ctl = flaky(&[0]);
        let err = ctl.panic().unwrap_err();
        assert!(matches!(err, Error::Io("write timed out")));
        assert_eq!(ctl.sink().attempts, 1);
        assert!(ctl.sink().written.is_empty());
    }

    #[test]
    fn panic_best_effort_keeps_going() {
        let mut ctl = flaky(&[0]);
        let err = ctl.panic_best_effort().unwrap_err();
        assert_eq!(err.as_io(), Some(&"write timed out"));
        assert_eq!(ctl.sink().written, vec![0xB0, 121, 0, 0xB0, 123, 0]);

        let mut ctl = flaky(&[]);
        ctl.panic_best_effort().unwrap();
        assert_eq!(ctl.sink().written.len(), 9);
    }

    #[test]
    fn io_failure_truncates_message() {
        let mut ctl = flaky(&[1]);
        assert!(ctl.note_on(60, None).is_err());
        assert_eq!(ctl.sink().written, vec![0x90]);
        assert_eq!(ctl.sink().attempts, 2);
    }

    #[test]
    fn bank_select_failure_skips_program() {
        let mut ctl = flaky(&[4]);
        assert!(ctl.program_change(5, Some(300)).is_err());
        assert_eq!(ctl.sink().written, vec![0xB0, 32, 44, 0xB0]);
        assert_eq!(ctl.sink().attempts, 5);
    }

    #[test]
    fn timeout_is_passed_to_every_byte() {
        let mut ctl = flaky(&[]);
        ctl.note_on(60, None).unwrap();
        assert_eq!(ctl.sink().timeouts, vec![DEFAULT_TIMEOUT; 3]);

        let timeout = Duration::from_millis(5);
        let mut ctl =
            Controller::with_timeout(FlakySink::default(), 1, timeout).unwrap();
        ctl.pitch_bend(None).unwrap();
        assert_eq!(ctl.sink().timeouts, vec![timeout; 3]);
    }

    #[test]
    fn send_prebuilt_messages() {
        let mut ctl = recorder(1);
        let other = Channel::new(2).unwrap();
        let msgs = [
            Message::from_ints(Command::NoteOn, other, 60, 1).unwrap(),
            Message::from_ints(Command::ChannelPressure, other, 30, 0).unwrap(),
        ];
        ctl.send_all(&msgs).unwrap();
        assert_eq!(ctl.sink(), &[0x91, 60, 1, 0xD1, 30, 0]);
    }
}

mod sinks {
    use super::*;

    #[test]
    fn controllers_share_a_port() {
        init_logging();
        let mut port = Vec::<u8>::new();
        {
            let mut lead = Controller::new(&mut port, 1).unwrap();
            lead.note_on(60, None).unwrap();
        }
        {
            let mut bass = Controller::new(&mut port, 2).unwrap();
            bass.note_on(36, None).unwrap();
        }
        assert_eq!(port, vec![0x90, 60, 127, 0x91, 36, 127]);
    }

    #[test]
    fn cursor_runs_out_of_space() {
        let mut buf = [0; 4];
        let mut ctl = Controller::new(Cursor::new(&mut buf), 1).unwrap();
        ctl.note_on(60, None).unwrap();
        let err = ctl.note_off(60, None).unwrap_err();
        assert!(matches!(err, Error::Io(CursorError::OutOfSpace)));
        assert_eq!(ctl.sink().written(), &[0x90, 60, 127, 0x80]);
        assert_eq!(ctl.sink().cursor(), 4);
        ctl.sink_mut().clear();
        ctl.all_notes_off().unwrap();
        let (buf, cur) = ctl.into_sink().into_parts();
        assert_eq!(&buf[..cur], &[0xB0, 123, 0]);
    }

    #[test]
    fn io_wrap_writes_through() {
        let mut ctl = Controller::new(IoWrap(Vec::<u8>::new()), 1).unwrap();
        ctl.pitch_bend(0x2000).unwrap();
        assert_eq!(ctl.into_sink().into_inner(), vec![0xE0, 0, 64]);
    }
}
