use crate::core::codec::CoordinateTrace;
use serde::Serialize;

/// Sequence, C-alpha trace and per-residue confidence for one accession.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureRecord {
    pub accession: String,
    pub sequence: String,
    pub trace: CoordinateTrace,
    pub plddt: String,
}

/// Client-facing rendering of a [`StructureRecord`]; coordinates are fixed
/// three-decimal strings, axis-major.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructurePayload {
    pub seq: String,
    pub coordinates: Vec<String>,
    pub plddt: String,
}

impl StructureRecord {
    pub fn residue_count(&self) -> usize {
        self.trace.residue_count()
    }

    pub fn to_payload(&self) -> StructurePayload {
        StructurePayload {
            seq: self.sequence.clone(),
            coordinates: self.trace.to_fixed(3),
            plddt: self.plddt.clone(),
        }
    }
}

/// The record bytes without the trailing `\n` and NUL terminators the exports
/// append. A sequence's residue count is the length of this slice.
pub fn trim_record(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| !matches!(b, b'\n' | b'\r' | 0))
        .map_or(0, |last| last + 1);
    &bytes[..end]
}

/// Decodes a stored text record after [`trim_record`].
pub fn record_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(trim_record(bytes)).into_owned()
}
