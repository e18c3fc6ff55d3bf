use rkyv::rancor;
use rkyv::util::AlignedVec;

use super::protocol::{ClientIntent, ServerMessage};

pub const MAX_FRAME_SIZE: usize = 1 << 20;
pub const FRAME_HEADER_LEN: usize = 4;
const COMPRESSION_LEVEL: i32 = 3;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("serialization failed: {0}")]
    Serialize(rancor::Error),
    #[error("deserialization failed: {0}")]
    Deserialize(rancor::Error),
    #[error("compression failed: {0}")]
    Compression(std::io::Error),
    #[error("frame of {0} bytes exceeds limit")]
    FrameTooLarge(usize),
    #[error("truncated frame: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
}

/// Payload length announced by a big-endian frame header.
pub fn frame_length(header: [u8; FRAME_HEADER_LEN]) -> Result<usize, CodecError> {
    let len = u32::from_be_bytes(header) as usize;
    if len > MAX_FRAME_SIZE {
        return Err(CodecError::FrameTooLarge(len));
    }
    Ok(len)
}

fn compress(bytes: &[u8]) -> Result<Vec<u8>, CodecError> {
    zstd::bulk::compress(bytes, COMPRESSION_LEVEL).map_err(CodecError::Compression)
}

fn decompress(payload: &[u8]) -> Result<AlignedVec, CodecError> {
    let raw = zstd::bulk::decompress(payload, MAX_FRAME_SIZE).map_err(CodecError::Compression)?;
    // rkyv validates alignment, the decompressed Vec<u8> gives no guarantee
    let mut aligned = AlignedVec::<16>::with_capacity(raw.len());
    aligned.extend_from_slice(&raw);
    Ok(aligned)
}

fn prefix(payload: Vec<u8>) -> Result<Vec<u8>, CodecError> {
    if payload.len() > MAX_FRAME_SIZE {
        return Err(CodecError::FrameTooLarge(payload.len()));
    }
    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

fn split_frame(frame: &[u8]) -> Result<&[u8], CodecError> {
    if frame.len() < FRAME_HEADER_LEN {
        return Err(CodecError::Truncated {
            expected: FRAME_HEADER_LEN,
            actual: frame.len(),
        });
    }
    let (header, payload) = frame.split_at(FRAME_HEADER_LEN);
    let mut len = [0u8; FRAME_HEADER_LEN];
    len.copy_from_slice(header);
    let expected = frame_length(len)?;
    if payload.len() < expected {
        return Err(CodecError::Truncated {
            expected,
            actual: payload.len(),
        });
    }
    Ok(&payload[..expected])
}

macro_rules! frame_codec {
    ($ty:ty) => {
        impl $ty {
            pub fn encode_frame(&self) -> Result<Vec<u8>, CodecError> {
                let bytes =
                    rkyv::to_bytes::<rancor::Error>(self).map_err(CodecError::Serialize)?;
                prefix(compress(&bytes)?)
            }

            /// Decodes a payload whose length header was already consumed.
            pub fn decode_payload(payload: &[u8]) -> Result<Self, CodecError> {
                let aligned = decompress(payload)?;
                rkyv::from_bytes::<Self, rancor::Error>(&aligned).map_err(CodecError::Deserialize)
            }

            pub fn decode_frame(frame: &[u8]) -> Result<Self, CodecError> {
                Self::decode_payload(split_frame(frame)?)
            }
        }
    };
}

frame_codec!(ServerMessage);
frame_codec!(ClientIntent);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{BattleTurnEvent, Side, TurnAction, TurnFlags};
    use crate::entity::{Creature, Direction, EntityId};
    use crate::net::{BattleAction, PlayerState, WorldSnapshot};

    #[test]
    fn snapshot_frame_decodes() {
        let snapshot = WorldSnapshot {
            viewpoint_id: Some(EntityId(7)),
            players: vec![PlayerState {
                id: EntityId(7),
                name: "Gold".into(),
                tile: [3, 4],
                pending: Some(Direction::Right),
                facing: Direction::Right,
                current_chunk: 2,
                party: vec![Creature {
                    species_id: 155,
                    experience: 125,
                    vitality: 20,
                    max_vitality: 20,
                    moves: vec![33, 43],
                }],
                inventory: Vec::new(),
                story_progress: 1,
            }],
            connected_ids: vec![EntityId(7)],
            turn_events: vec![
                BattleTurnEvent::new(EntityId(7), Side::Player, TurnAction::Flee, 20, 9)
                    .with_flags(TurnFlags::BATTLE_OVER | TurnFlags::FLED),
            ],
            ..Default::default()
        };
        let message = ServerMessage::Snapshot(snapshot);

        let frame = message.encode_frame().unwrap();
        let header: [u8; 4] = frame[..4].try_into().unwrap();
        assert_eq!(frame_length(header).unwrap(), frame.len() - 4);
        assert_eq!(ServerMessage::decode_frame(&frame).unwrap(), message);
    }

    #[test]
    fn intent_frame_decodes() {
        let intent = ClientIntent::BattleAction(BattleAction::Swap { party_index: 2 });
        let frame = intent.encode_frame().unwrap();
        assert_eq!(ClientIntent::decode_frame(&frame).unwrap(), intent);
    }

    #[test]
    fn oversized_header_is_rejected() {
        let header = ((MAX_FRAME_SIZE + 1) as u32).to_be_bytes();
        assert!(matches!(frame_length(header), Err(CodecError::FrameTooLarge(_))));
    }

    #[test]
    fn truncated_frame_is_rejected() {
        let frame = ClientIntent::LogOut.encode_frame().unwrap();
        let result = ClientIntent::decode_frame(&frame[..frame.len() - 1]);
        assert!(matches!(result, Err(CodecError::Truncated { .. })));
    }

    #[test]
    fn garbage_payload_fails_cleanly() {
        assert!(ServerMessage::decode_payload(&[1, 2, 3, 4, 5]).is_err());
    }
}
