//! BCMR announcement script parser.
//!
//! ```text
//! OP_RETURN <"BCMR"> <32-byte content hash> [<uri> ...]
//!    6a      04 42434d52     20 <hash>        <push>...
//! ```
//!
//! Every element after OP_RETURN must be a data push (direct, PUSHDATA1,
//! PUSHDATA2 or PUSHDATA4).

use shared_types::{Hash, RegistryMetadata};
use thiserror::Error;
use tracing::debug;

const OP_RETURN: u8 = 0x6a;
const OP_PUSHDATA1: u8 = 0x4c;
const OP_PUSHDATA2: u8 = 0x4d;
const OP_PUSHDATA4: u8 = 0x4e;

/// Protocol identifier pushed right after OP_RETURN.
pub const BCMR_IDENTIFIER: &[u8] = b"BCMR";

/// Hex prefix every BCMR announcement script starts with.
pub const BCMR_PREFIX_HEX: &str = "6a0442434d52";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("script does not start with OP_RETURN")]
    NotNullData,

    #[error("non-push opcode 0x{opcode:02x} at offset {offset}")]
    NonPushOpcode { opcode: u8, offset: usize },

    #[error("push at offset {offset} runs past end of script")]
    Truncated { offset: usize },
}

/// Split an OP_RETURN script into its data pushes.
pub fn parse_pushes(script: &[u8]) -> Result<Vec<&[u8]>, ScriptError> {
    if script.first() != Some(&OP_RETURN) {
        return Err(ScriptError::NotNullData);
    }

    let mut pushes = Vec::new();
    let mut cursor = 1;
    while cursor < script.len() {
        let offset = cursor;
        let opcode = script[cursor];
        cursor += 1;

        let len = match opcode {
            0x00..=0x4b => opcode as usize,
            OP_PUSHDATA1 => read_len(script, &mut cursor, 1, offset)?,
            OP_PUSHDATA2 => read_len(script, &mut cursor, 2, offset)?,
            OP_PUSHDATA4 => read_len(script, &mut cursor, 4, offset)?,
            _ => return Err(ScriptError::NonPushOpcode { opcode, offset }),
        };

        let end = cursor
            .checked_add(len)
            .filter(|end| *end <= script.len())
            .ok_or(ScriptError::Truncated { offset })?;
        pushes.push(&script[cursor..end]);
        cursor = end;
    }
    Ok(pushes)
}

/// Little-endian length prefix of `width` bytes.
fn read_len(script: &[u8], cursor: &mut usize, width: usize, offset: usize) -> Result<usize, ScriptError> {
    let bytes = script
        .get(*cursor..*cursor + width)
        .ok_or(ScriptError::Truncated { offset })?;
    *cursor += width;
    Ok(bytes
        .iter()
        .rev()
        .fold(0usize, |acc, byte| (acc << 8) | *byte as usize))
}

/// Extract registry metadata from a BCMR announcement script.
///
/// Returns `None` for anything that is not a well-formed announcement.
/// URIs that are not valid UTF-8 are dropped; an announcement with a hash
/// and no URIs is still returned.
pub fn parse_bcmr(script: &[u8]) -> Option<RegistryMetadata> {
    let pushes = match parse_pushes(script) {
        Ok(pushes) => pushes,
        Err(e) => {
            debug!(error = %e, "Not a BCMR script");
            return None;
        }
    };

    let [identifier, hash, uris @ ..] = pushes.as_slice() else {
        return None;
    };
    if *identifier != BCMR_IDENTIFIER {
        return None;
    }
    let hash: Hash = (*hash).try_into().ok()?;

    let uris = uris
        .iter()
        .filter_map(|push| match std::str::from_utf8(push) {
            Ok(uri) => Some(uri.to_string()),
            Err(_) => {
                debug!(bytes = push.len(), "Skipping non-UTF-8 BCMR uri");
                None
            }
        })
        .collect();

    Some(RegistryMetadata { hash, uris })
}
