//! Source resolution: turns a located source reference into pattern code
//! plus a human-readable description.
//!
//! Resolution never fails: undecodable hashes and share IDs (which cannot be
//! fetched offline) fall back to [`DEFAULT_SOURCE`], with the reason carried
//! in the description.

pub mod decode;
pub mod location;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub use decode::{decode_hash_payload, DecodeError};

/// Code compiled when no source is given or it cannot be resolved.
pub const DEFAULT_SOURCE: &str = r#"$: s("bd [sd hh] bd sd").fast(1)"#;

/// Description used for [`DEFAULT_SOURCE`].
pub const DEFAULT_STATUS: &str = "default pattern";

/// Description used when a hash payload cannot be decoded.
pub const DECODE_FAILED_STATUS: &str = "hash decode failed - fallback pattern";

/// Characters of code kept in a description snippet.
pub const SNIPPET_LEN: usize = 48;

/// Where the source text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    /// Plain code.
    Code,
    /// Base64-encoded code from a URL fragment.
    Hash,
    /// A share ID that would need a network lookup.
    ShareId,
}

/// A reference to pattern source, as found by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub kind: SourceKind,
    pub payload: String,
    /// The share link a nested hash was taken from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl SourceRef {
    pub fn code(code: impl Into<String>) -> Self {
        Self::new(SourceKind::Code, code)
    }

    pub fn hash(payload: impl Into<String>) -> Self {
        Self::new(SourceKind::Hash, payload)
    }

    pub fn share_id(id: impl Into<String>) -> Self {
        Self::new(SourceKind::ShareId, id)
    }

    fn new(kind: SourceKind, payload: impl Into<String>) -> Self {
        Self {
            kind,
            payload: payload.into(),
            source_url: None,
        }
    }
}

/// Code ready for compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSource {
    pub code: String,
    pub description: String,
}

impl ResolvedSource {
    fn fallback(description: impl Into<String>) -> Self {
        Self {
            code: DEFAULT_SOURCE.to_string(),
            description: description.into(),
        }
    }
}

/// Resolve a source reference into code.
pub fn resolve(source: Option<&SourceRef>) -> ResolvedSource {
    let Some(source) = source else {
        return ResolvedSource::fallback(DEFAULT_STATUS);
    };

    match source.kind {
        SourceKind::Code => ResolvedSource {
            description: describe("inline", &source.payload),
            code: source.payload.clone(),
        },
        SourceKind::Hash => match decode_hash_payload(&source.payload) {
            Ok(code) => ResolvedSource {
                description: describe("hash", &code),
                code,
            },
            Err(e) => {
                warn!(error = %e, "failed to decode hash payload");
                ResolvedSource::fallback(DECODE_FAILED_STATUS)
            }
        },
        SourceKind::ShareId => {
            ResolvedSource::fallback(format!("share ID ({}) not supported offline", source.payload))
        }
    }
}

/// `"<prefix>: <snippet>"`, the snippet being the whitespace-collapsed code
/// cut to [`SNIPPET_LEN`] characters.
pub fn describe(prefix: &str, code: &str) -> String {
    let compact = code.split_whitespace().collect::<Vec<_>>().join(" ");
    if compact.chars().count() > SNIPPET_LEN {
        let cut: String = compact.chars().take(SNIPPET_LEN).collect();
        format!("{prefix}: {cut}…")
    } else {
        format!("{prefix}: {compact}")
    }
}

/// Final status line: the description plus the lane count.
pub fn status_line(description: &str, lanes: usize) -> String {
    let plural = if lanes == 1 { "" } else { "s" };
    format!("{description} ({lanes} lane{plural})")
}
