//! Processing status shared by complaints and occurrences

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Status of a submitted record, always as reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum RecordStatus {
    #[serde(rename = "aberta")]
    Open,
    #[serde(rename = "em_andamento")]
    InProgress,
    #[serde(rename = "resolvida")]
    Resolved,
    #[serde(rename = "cancelada")]
    Cancelled,
    /// A status this client does not know yet
    #[serde(other)]
    Unknown,
}

impl RecordStatus {
    /// Wire representation, `Unknown` has none of its own
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "aberta",
            Self::InProgress => "em_andamento",
            Self::Resolved => "resolvida",
            Self::Cancelled => "cancelada",
            Self::Unknown => "desconhecida",
        }
    }

    /// Whether the administration has finished handling the record
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Resolved | Self::Cancelled)
    }
}

impl Serialize for RecordStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_does_not_fail_decoding() {
        let status: RecordStatus = serde_json::from_str(r#""arquivada""#).unwrap();
        assert_eq!(status, RecordStatus::Unknown);

        let status: RecordStatus = serde_json::from_str(r#""em_andamento""#).unwrap();
        assert_eq!(status, RecordStatus::InProgress);
        assert!(!status.is_closed());
    }

    #[test]
    fn serializes_as_its_wire_name() {
        assert_eq!(
            serde_json::to_string(&RecordStatus::InProgress).unwrap(),
            r#""em_andamento""#
        );
        assert_eq!(
            serde_json::to_string(&RecordStatus::Unknown).unwrap(),
            format!("\"{}\"", RecordStatus::Unknown.as_str())
        );
    }
}
