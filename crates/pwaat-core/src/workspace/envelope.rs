//! Workspace file envelope (`*.pwaatws`)
//!
//! ```text
//! ┌────────┬─────────┬──────────────┬──────────────────────────────────┐
//! │ "PWWS" │ version │ length (u32) │ JSON { "Tag": u8, "Record": {} } │
//! │ 4 B    │ 1 B     │ 4 B, LE      │ length B                         │
//! └────────┴─────────┴──────────────┴──────────────────────────────────┘
//! ```
//!
//! The record keeps its field names so that fields added later decode
//! with defaults from older files.

use super::types::{
    BinaryWorkspace, CryptographyWorkspace, ExtractorKind, ScenarioWorkspace, WorkspaceConfig,
};
use serde::{Deserialize, Serialize};

/// File extension of workspace files (without the dot)
pub const WORKSPACE_EXTENSION: &str = "pwaatws";

const MAGIC: &[u8; 4] = b"PWWS";
const FORMAT_VERSION: u8 = 1;
const HEADER_LEN: usize = MAGIC.len() + 1 + 4;

/// Why an envelope could not be decoded
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("file is too short to be a workspace ({0} bytes)")]
    Truncated(usize),

    #[error("not a workspace file (bad magic)")]
    BadMagic,

    #[error("unsupported workspace format version {0}")]
    UnsupportedVersion(u8),

    #[error("declared payload length {declared} does not match actual {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("unknown workspace tag {0}")]
    UnknownTag(u8),

    #[error("invalid workspace record: {0}")]
    Record(#[from] serde_json::Error),

    #[error("workspace record too large ({0} bytes)")]
    TooLarge(usize),
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct EnvelopeOut<'a, T: Serialize> {
    tag: u8,
    record: &'a T,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EnvelopeIn {
    tag: u8,
    #[serde(default)]
    record: serde_json::Value,
}

/// Encode a workspace into envelope bytes.
pub fn encode(config: &WorkspaceConfig) -> Result<Vec<u8>, EnvelopeError> {
    let tag = config.kind().tag();
    let payload = match config {
        WorkspaceConfig::Binary(ws) => serde_json::to_vec(&EnvelopeOut { tag, record: ws })?,
        WorkspaceConfig::Scenario(ws) => serde_json::to_vec(&EnvelopeOut { tag, record: ws })?,
        WorkspaceConfig::Cryptography(ws) => {
            serde_json::to_vec(&EnvelopeOut { tag, record: ws })?
        }
    };

    let length =
        u32::try_from(payload.len()).map_err(|_| EnvelopeError::TooLarge(payload.len()))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.push(FORMAT_VERSION);
    bytes.extend_from_slice(&length.to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decode envelope bytes into a workspace.
///
/// The speaker list of a scenario workspace is left empty; it is loaded
/// separately from its side document.
pub fn decode(bytes: &[u8]) -> Result<WorkspaceConfig, EnvelopeError> {
    if bytes.len() < HEADER_LEN {
        return Err(EnvelopeError::Truncated(bytes.len()));
    }
    let (header, payload) = bytes.split_at(HEADER_LEN);

    if &header[..4] != MAGIC {
        return Err(EnvelopeError::BadMagic);
    }

    let version = header[4];
    if version == 0 || version > FORMAT_VERSION {
        return Err(EnvelopeError::UnsupportedVersion(version));
    }

    let declared = u32::from_le_bytes([header[5], header[6], header[7], header[8]]) as usize;
    if declared != payload.len() {
        return Err(EnvelopeError::LengthMismatch {
            declared,
            actual: payload.len(),
        });
    }

    let envelope: EnvelopeIn = serde_json::from_slice(payload)?;
    let kind = ExtractorKind::from_tag(envelope.tag).ok_or(EnvelopeError::UnknownTag(envelope.tag))?;

    // A missing record decodes to an all-default workspace of that kind
    let record = match envelope.record {
        serde_json::Value::Null => serde_json::Value::Object(Default::default()),
        other => other,
    };

    let config = match kind {
        ExtractorKind::Binary => {
            WorkspaceConfig::Binary(serde_json::from_value::<BinaryWorkspace>(record)?)
        }
        ExtractorKind::Scenario => {
            WorkspaceConfig::Scenario(serde_json::from_value::<ScenarioWorkspace>(record)?)
        }
        ExtractorKind::Cryptography => WorkspaceConfig::Cryptography(serde_json::from_value::<
            CryptographyWorkspace,
        >(record)?),
    };
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::speakers::SpeakerRegistry;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn wrap(json: &str) -> Vec<u8> {
        let mut bytes = MAGIC.to_vec();
        bytes.push(FORMAT_VERSION);
        bytes.extend_from_slice(&(json.len() as u32).to_le_bytes());
        bytes.extend_from_slice(json.as_bytes());
        bytes
    }

    #[test]
    fn test_header_layout() {
        let bytes = encode(&WorkspaceConfig::empty(ExtractorKind::Cryptography)).unwrap();
        assert_eq!(&bytes[..4], b"PWWS");
        assert_eq!(bytes[4], 1);
        let length = u32::from_le_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]) as usize;
        assert_eq!(length, bytes.len() - HEADER_LEN);

        let payload: serde_json::Value = serde_json::from_slice(&bytes[HEADER_LEN..]).unwrap();
        assert_eq!(payload["Tag"], 2);
        assert!(payload["Record"]["DecryptionInputPath"].is_string());
    }

    #[test]
    fn test_scenario_roundtrip_drops_speakers() {
        let config = WorkspaceConfig::Scenario(ScenarioWorkspace {
            root_workspace_path: PathBuf::from("/ws"),
            speaker_definition_path: PathBuf::from("/ws/speaker_definitions.json"),
            desimplification_original_path: PathBuf::from("/ws/desimplification/original"),
            speaker_definitions: SpeakerRegistry::seeded(),
            ..Default::default()
        });

        let bytes = encode(&config).unwrap();
        let text = String::from_utf8_lossy(&bytes[HEADER_LEN..]).to_string();
        assert!(!text.contains("Unknown Speaker"));

        let decoded = decode(&bytes).unwrap();
        let scenario = decoded.as_scenario().unwrap();
        assert!(scenario.speaker_definitions.is_empty());
        assert_eq!(
            scenario.desimplification_original_path,
            PathBuf::from("/ws/desimplification/original")
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let bytes = wrap(r#"{"Tag":0,"Record":{"RootWorkspacePath":"/ws","FutureField":42}}"#);
        let decoded = decode(&bytes).unwrap();
        assert_eq!(
            decoded,
            WorkspaceConfig::Binary(BinaryWorkspace {
                root_workspace_path: PathBuf::from("/ws"),
                ..Default::default()
            })
        );

        let bare = decode(&wrap(r#"{"Tag":2}"#)).unwrap();
        assert_eq!(bare, WorkspaceConfig::empty(ExtractorKind::Cryptography));
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(matches!(decode(b"PWW"), Err(EnvelopeError::Truncated(3))));
        assert!(matches!(
            decode(b"NOPE\x01\x00\x00\x00\x00"),
            Err(EnvelopeError::BadMagic)
        ));

        let mut future = wrap("{}");
        future[4] = FORMAT_VERSION + 1;
        assert!(matches!(
            decode(&future),
            Err(EnvelopeError::UnsupportedVersion(_))
        ));

        let mut truncated = wrap(r#"{"Tag":0,"Record":{}}"#);
        truncated.pop();
        assert!(matches!(
            decode(&truncated),
            Err(EnvelopeError::LengthMismatch { .. })
        ));

        assert!(matches!(
            decode(&wrap(r#"{"Tag":9,"Record":{}}"#)),
            Err(EnvelopeError::UnknownTag(9))
        ));
        assert!(matches!(
            decode(&wrap("not json")),
            Err(EnvelopeError::Record(_))
        ));
    }
}
