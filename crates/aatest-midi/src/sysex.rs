//! KeyStep Pro transport SysEx.
//!
//! The controller reports its transport buttons as 4-byte universal real-time
//! messages: `7F 7F 06 <cmd>`. Payloads of any other length, or with a
//! different sentinel, are not transport messages and are ignored.

use std::fmt;

pub const KEYSTEP_PRO_SYSEX_MSG_SIZE: usize = 4;
pub const KEYSTEP_PRO_SENTINEL: [u8; 3] = [0x7F, 0x7F, 0x06];

pub const KEYSTEP_PRO_RECORD_OFF_ON: u8 = 0x06;
pub const KEYSTEP_PRO_RECORD_ON_OFF: u8 = 0x07;
pub const KEYSTEP_PRO_STOP: u8 = 0x01;
pub const KEYSTEP_PRO_PLAY_OFF_ON: u8 = 0x02;
pub const KEYSTEP_PRO_PLAY_PAUSE: u8 = 0x09;

const SYSEX_START: u8 = 0xF0;
const SYSEX_END: u8 = 0xF7;

/// System Exclusive payload, without the F0/F7 framing bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SysEx {
    data: Vec<u8>,
}

impl SysEx {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            data: payload.into(),
        }
    }

    /// Strip a leading `F0` and trailing `F7` when present.
    pub fn from_framed(bytes: &[u8]) -> Self {
        let bytes = bytes.strip_prefix(&[SYSEX_START]).unwrap_or(bytes);
        let bytes = bytes.strip_suffix(&[SYSEX_END]).unwrap_or(bytes);
        Self::new(bytes)
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn transport_command(&self) -> Option<TransportCommand> {
        TransportCommand::from_payload(&self.data)
    }
}

/// The three transport buttons a trigger can listen to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportKind {
    Record,
    Stop,
    Play,
}

impl TransportKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "record" => Some(TransportKind::Record),
            "stop" => Some(TransportKind::Stop),
            "play" => Some(TransportKind::Play),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Record => "record",
            TransportKind::Stop => "stop",
            TransportKind::Play => "play",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportCommand {
    RecordOn,
    RecordOff,
    Stop,
    Play,
    Pause,
}

impl TransportCommand {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            KEYSTEP_PRO_RECORD_OFF_ON => Some(TransportCommand::RecordOn),
            KEYSTEP_PRO_RECORD_ON_OFF => Some(TransportCommand::RecordOff),
            KEYSTEP_PRO_STOP => Some(TransportCommand::Stop),
            KEYSTEP_PRO_PLAY_OFF_ON => Some(TransportCommand::Play),
            KEYSTEP_PRO_PLAY_PAUSE => Some(TransportCommand::Pause),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            TransportCommand::RecordOn => KEYSTEP_PRO_RECORD_OFF_ON,
            TransportCommand::RecordOff => KEYSTEP_PRO_RECORD_ON_OFF,
            TransportCommand::Stop => KEYSTEP_PRO_STOP,
            TransportCommand::Play => KEYSTEP_PRO_PLAY_OFF_ON,
            TransportCommand::Pause => KEYSTEP_PRO_PLAY_PAUSE,
        }
    }

    pub fn kind(&self) -> TransportKind {
        match self {
            TransportCommand::RecordOn | TransportCommand::RecordOff => TransportKind::Record,
            TransportCommand::Stop => TransportKind::Stop,
            TransportCommand::Play | TransportCommand::Pause => TransportKind::Play,
        }
    }

    /// Validate the full payload shape, then decode the command byte.
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        if payload.len() != KEYSTEP_PRO_SYSEX_MSG_SIZE {
            return None;
        }
        if payload[..3] != KEYSTEP_PRO_SENTINEL {
            return None;
        }
        let command = Self::from_code(payload[3]);
        if command.is_none() {
            tracing::trace!("Ignoring KeyStep Pro command {:#04x}", payload[3]);
        }
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_commands() {
        let cases = [
            (0x06, TransportCommand::RecordOn, TransportKind::Record),
            (0x07, TransportCommand::RecordOff, TransportKind::Record),
            (0x01, TransportCommand::Stop, TransportKind::Stop),
            (0x02, TransportCommand::Play, TransportKind::Play),
            (0x09, TransportCommand::Pause, TransportKind::Play),
        ];
        for (code, command, kind) in cases {
            let payload = [0x7F, 0x7F, 0x06, code];
            assert_eq!(TransportCommand::from_payload(&payload), Some(command));
            assert_eq!(command.kind(), kind);
            assert_eq!(command.code(), code);
        }
    }

    #[test]
    fn test_wrong_length_is_ignored() {
        assert_eq!(TransportCommand::from_payload(&[0x7F, 0x7F, 0x06]), None);
        assert_eq!(
            TransportCommand::from_payload(&[0x7F, 0x7F, 0x06, 0x01, 0x00]),
            None
        );
        assert_eq!(TransportCommand::from_payload(&[]), None);
    }

    #[test]
    fn test_wrong_sentinel_is_ignored() {
        assert_eq!(TransportCommand::from_payload(&[0x7E, 0x7F, 0x06, 0x01]), None);
        assert_eq!(TransportCommand::from_payload(&[0x7F, 0x00, 0x06, 0x01]), None);
        assert_eq!(TransportCommand::from_payload(&[0x7F, 0x7F, 0x05, 0x01]), None);
    }

    #[test]
    fn test_unknown_code_is_ignored() {
        assert_eq!(TransportCommand::from_payload(&[0x7F, 0x7F, 0x06, 0x04]), None);
    }

    #[test]
    fn test_from_framed() {
        let framed = SysEx::from_framed(&[0xF0, 0x7F, 0x7F, 0x06, 0x07, 0xF7]);
        assert_eq!(framed.len(), 4);
        assert_eq!(framed.transport_command(), Some(TransportCommand::RecordOff));

        let bare = SysEx::from_framed(&[0x7F, 0x7F, 0x06, 0x01]);
        assert_eq!(bare.payload(), &[0x7F, 0x7F, 0x06, 0x01]);
    }

    #[test]
    fn test_kind_names() {
        for kind in [TransportKind::Record, TransportKind::Stop, TransportKind::Play] {
            assert_eq!(TransportKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(TransportKind::from_name("rewind"), None);
    }
}
