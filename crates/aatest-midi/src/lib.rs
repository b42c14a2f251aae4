//! MIDI decoding for aatest.
//!
//! Two kinds of incoming MIDI matter to an AA module:
//!
//! - **Notes**: channel note-on/note-off, forwarded to the plugin
//! - **Transport SysEx**: the 4-byte machine-control messages an Arturia
//!   KeyStep Pro sends for record/stop/play
//!
//! Everything else is decoded as [`MidiInput::Other`] and ignored by the host.
//!
//! # Example
//!
//! ```ignore
//! use aatest_midi::{decode, MidiInput, TransportCommand};
//!
//! match decode(&[0xF0, 0x7F, 0x7F, 0x06, 0x01, 0xF7])? {
//!     MidiInput::SysEx(sysex) => {
//!         assert_eq!(sysex.transport_command(), Some(TransportCommand::Stop));
//!     }
//!     _ => {}
//! }
//! ```

pub mod error;
pub use error::{Error, Result};

mod event;
pub use event::{decode, MidiInput, NoteEvent};

mod sysex;
pub use sysex::{
    SysEx, TransportCommand, TransportKind, KEYSTEP_PRO_PLAY_OFF_ON, KEYSTEP_PRO_PLAY_PAUSE,
    KEYSTEP_PRO_RECORD_OFF_ON, KEYSTEP_PRO_RECORD_ON_OFF, KEYSTEP_PRO_SENTINEL, KEYSTEP_PRO_STOP,
    KEYSTEP_PRO_SYSEX_MSG_SIZE,
};

mod utils;
pub use utils::velocity_to_unit;
