//! Reposition batch wire format: `&`-joined `id=value` tokens where the
//! value is either `position` or `parentId,position` for cross-parent
//! moves. A malformed batch is rejected whole, before any write.

use crate::{
    error::EngineError,
    model::{Block, Col, Zone},
    position::{BlockMove, ColMove, ZoneMove},
    types::{Id, Ulid},
};
use thiserror::Error as ThisError;

///
/// RepositionParseError
///

#[derive(Debug, ThisError)]
pub enum RepositionParseError {
    #[error("empty reposition batch")]
    Empty,

    #[error("malformed token: '{token}'")]
    MalformedToken { token: String },

    #[error("bad identifier in token: '{token}'")]
    BadId { token: String },

    #[error("bad position in token: '{token}'")]
    BadPosition { token: String },

    #[error("unexpected parent in zone token: '{token}'")]
    UnexpectedParent { token: String },
}

impl From<RepositionParseError> for EngineError {
    fn from(err: RepositionParseError) -> Self {
        Self::interface_unsupported(err.to_string())
    }
}

///
/// RawMove
///
/// One parsed batch token, untyped as to tree level.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RawMove {
    pub id: Ulid,
    pub parent: Option<Ulid>,
    pub position: u32,
}

/// Parse a serialized batch ("a=2&b=1" / "a=colX,1").
pub fn parse_batch(raw: &str) -> Result<Vec<RawMove>, RepositionParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RepositionParseError::Empty);
    }

    trimmed.split('&').map(parse_token).collect()
}

fn parse_token(token: &str) -> Result<RawMove, RepositionParseError> {
    let malformed = || RepositionParseError::MalformedToken {
        token: token.to_string(),
    };

    let (key, value) = token.split_once('=').ok_or_else(malformed)?;
    let id = parse_ulid(key, token)?;

    let (parent, position) = match value.split_once(',') {
        Some((parent, position)) => (Some(parse_ulid(parent, token)?), position),
        None => (None, value),
    };

    let position: u32 = position
        .trim()
        .parse()
        .map_err(|_| RepositionParseError::BadPosition {
            token: token.to_string(),
        })?;
    if position == 0 {
        return Err(RepositionParseError::BadPosition {
            token: token.to_string(),
        });
    }

    Ok(RawMove {
        id,
        parent,
        position,
    })
}

fn parse_ulid(part: &str, token: &str) -> Result<Ulid, RepositionParseError> {
    part.trim()
        .parse()
        .map_err(|_| RepositionParseError::BadId {
            token: token.to_string(),
        })
}

/// Type a parsed batch as Block moves (parent = destination Col).
#[must_use]
pub fn block_moves(batch: &[RawMove]) -> Vec<BlockMove> {
    batch
        .iter()
        .map(|raw| BlockMove {
            block: Id::<Block>::from_ulid(raw.id),
            col: raw.parent.map(Id::<Col>::from_ulid),
            position: raw.position,
        })
        .collect()
}

/// Type a parsed batch as Col moves (parent = destination Zone).
#[must_use]
pub fn col_moves(batch: &[RawMove]) -> Vec<ColMove> {
    batch
        .iter()
        .map(|raw| ColMove {
            col: Id::<Col>::from_ulid(raw.id),
            zone: raw.parent.map(Id::<Zone>::from_ulid),
            position: raw.position,
        })
        .collect()
}

/// Type a parsed batch as Zone moves; zones never re-parent.
pub fn zone_moves(batch: &[RawMove]) -> Result<Vec<ZoneMove>, RepositionParseError> {
    batch
        .iter()
        .map(|raw| {
            if raw.parent.is_some() {
                return Err(RepositionParseError::UnexpectedParent {
                    token: raw.id.to_string(),
                });
            }
            Ok(ZoneMove {
                zone: Id::<Zone>::from_ulid(raw.id),
                position: raw.position,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_pairs() {
        let a = Ulid::generate();
        let b = Ulid::generate();
        let raw = format!("{a}=2&{b}=1");

        let batch = parse_batch(&raw).unwrap();
        assert_eq!(
            batch,
            vec![
                RawMove { id: a, parent: None, position: 2 },
                RawMove { id: b, parent: None, position: 1 },
            ]
        );
    }

    #[test]
    fn parses_cross_parent_values() {
        let block = Ulid::generate();
        let col = Ulid::generate();
        let raw = format!("{block}={col},3");

        let batch = parse_batch(&raw).unwrap();
        assert_eq!(batch[0].parent, Some(col));
        assert_eq!(batch[0].position, 3);
    }

    #[test]
    fn rejects_malformed_batches_whole() {
        let a = Ulid::generate();

        assert!(matches!(
            parse_batch(""),
            Err(RepositionParseError::Empty)
        ));
        assert!(matches!(
            parse_batch(&format!("{a}=1&junk")),
            Err(RepositionParseError::MalformedToken { .. })
        ));
        assert!(matches!(
            parse_batch(&format!("{a}=zero")),
            Err(RepositionParseError::BadPosition { .. })
        ));
        assert!(matches!(
            parse_batch(&format!("{a}=0")),
            Err(RepositionParseError::BadPosition { .. })
        ));
        assert!(matches!(
            parse_batch("not-a-ulid=1"),
            Err(RepositionParseError::BadId { .. })
        ));
    }

    #[test]
    fn zone_moves_reject_parents() {
        let zone = Ulid::generate();
        let other = Ulid::generate();
        let batch = parse_batch(&format!("{zone}={other},1")).unwrap();

        assert!(matches!(
            zone_moves(&batch),
            Err(RepositionParseError::UnexpectedParent { .. })
        ));
    }
}
