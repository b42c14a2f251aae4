//! Incoming MIDI classification.

use midi_msg::{ChannelVoiceMsg, MidiMsg};

use crate::error::{Error, Result};
use crate::sysex::SysEx;

const SYSEX_START: u8 = 0xF0;

/// A note message reduced to what the AA runtime consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoteEvent {
    pub channel: u8,
    pub pitch: u8,
    /// 0 means note-off.
    pub velocity: u8,
}

impl NoteEvent {
    #[inline]
    pub fn new(channel: u8, pitch: u8, velocity: u8) -> Self {
        Self {
            channel,
            pitch,
            velocity,
        }
    }

    #[inline]
    pub fn is_note_on(&self) -> bool {
        self.velocity > 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MidiInput {
    Note(NoteEvent),
    SysEx(SysEx),
    Other,
}

/// Classify one complete MIDI message.
///
/// SysEx is recognised by its `F0` status byte before any other parsing, so
/// manufacturer payloads never reach the channel-message parser.
pub fn decode(bytes: &[u8]) -> Result<MidiInput> {
    match bytes.first() {
        None => Err(Error::Empty),
        Some(&SYSEX_START) => Ok(MidiInput::SysEx(SysEx::from_framed(bytes))),
        Some(_) => {
            let (msg, _len) = MidiMsg::from_midi(bytes)?;
            Ok(match msg {
                MidiMsg::ChannelVoice { channel, msg } => match msg {
                    ChannelVoiceMsg::NoteOn { note, velocity } => {
                        MidiInput::Note(NoteEvent::new(channel as u8, note, velocity))
                    }
                    ChannelVoiceMsg::NoteOff { note, .. } => {
                        MidiInput::Note(NoteEvent::new(channel as u8, note, 0))
                    }
                    _ => MidiInput::Other,
                },
                _ => MidiInput::Other,
            })
        }
    }
}
