//! Wire format of a mind map: `{ "id": ..., "label": ..., "children": [...] }`

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::error::ParseError;

/// One node of a serialized mind map.
///
/// `children` may be missing or `null`; both mean "leaf". Extra keys (colors,
/// notes and other metadata) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindMapNode {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<MindMapNode>>,
}

impl MindMapNode {
    pub fn leaf(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: None,
        }
    }

    pub fn with_children(
        id: impl Into<String>,
        label: impl Into<String>,
        children: Vec<MindMapNode>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: Some(children),
        }
    }

    /// Children in order; empty for leaves.
    pub fn children(&self) -> &[MindMapNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }
}

/// Parse a mind-map document.
///
/// Fails closed: invalid JSON, a missing `id`/`label`, wrong field types and
/// unknown fields all produce a [`ParseError`].
#[instrument(level = "debug", skip(json), fields(len = json.len()))]
pub fn parse_document(json: &str) -> Result<MindMapNode, ParseError> {
    serde_json::from_str(json).map_err(ParseError::from)
}

/// Parse a document given as raw bytes, e.g. straight from a file.
///
/// Bytes that are not UTF-8 are a malformed document like any other and
/// are reported at the first offending byte.
pub fn parse_document_bytes(bytes: &[u8]) -> Result<MindMapNode, ParseError> {
    let json = std::str::from_utf8(bytes).map_err(|e| {
        let valid = &bytes[..e.valid_up_to()];
        let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = valid.iter().rposition(|&b| b == b'\n').map_or(0, |i| i + 1);
        let column = String::from_utf8_lossy(&valid[line_start..]).chars().count() + 1;
        ParseError {
            message: format!("invalid UTF-8 at line {} column {}", line, column),
            line,
            column,
        }
    })?;
    parse_document(json)
}
