//! Types for occurrences (suggestions, compliments and denunciations)

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::status::RecordStatus;

/// Kind of occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccurrenceKind {
    #[serde(rename = "sugestao")]
    Suggestion,
    #[serde(rename = "elogio")]
    Compliment,
    #[serde(rename = "denuncia")]
    Denunciation,
}

impl OccurrenceKind {
    /// Wire representation used in query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Suggestion => "sugestao",
            Self::Compliment => "elogio",
            Self::Denunciation => "denuncia",
        }
    }
}

impl fmt::Display for OccurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compliment, suggestion or denunciation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    /// The occurrence ID
    pub id: i64,

    /// Server-assigned tracking number
    #[serde(rename = "protocolo")]
    pub protocol: String,

    #[serde(rename = "tipo")]
    pub kind: OccurrenceKind,

    /// Administration sector the occurrence is addressed to
    #[serde(rename = "setor")]
    pub sector: String,

    #[serde(rename = "data")]
    pub date: NaiveDate,

    #[serde(rename = "assunto")]
    pub subject: String,

    #[serde(rename = "detalhes")]
    pub details: String,

    pub status: RecordStatus,

    #[serde(rename = "usuario_id")]
    pub user_id: i64,

    /// Satisfaction score given by the user, 1 to 5
    #[serde(rename = "satisfacao", default)]
    pub satisfaction: Option<u8>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for submitting an occurrence
#[derive(Debug, Clone, Serialize)]
pub struct NewOccurrence {
    #[serde(rename = "tipo")]
    pub kind: OccurrenceKind,
    #[serde(rename = "setor")]
    pub sector: String,
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "assunto")]
    pub subject: String,
    #[serde(rename = "detalhes")]
    pub details: String,
    #[serde(rename = "usuario_id")]
    pub user_id: i64,
}

/// Client-editable occurrence fields
#[derive(Debug, Clone, Default, Serialize)]
pub struct OccurrenceUpdate {
    #[serde(rename = "assunto", skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(rename = "detalhes", skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Answer posted by the administration to an occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceReply {
    pub id: i64,
    #[serde(rename = "ocorrencia_id")]
    pub occurrence_id: i64,
    #[serde(rename = "resposta")]
    pub text: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// User satisfaction with the handling of an occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SatisfactionRating {
    #[serde(rename = "ocorrencia_id")]
    pub occurrence_id: i64,
    #[serde(rename = "satisfacao")]
    pub score: u8,
}

impl SatisfactionRating {
    /// Build a rating, the score must be within 1..=5
    pub fn new(occurrence_id: i64, score: u8) -> Result<Self, Error> {
        if !(1..=5).contains(&score) {
            return Err(Error::invalid_input(format!(
                "satisfaction score must be between 1 and 5, got {score}"
            )));
        }
        Ok(Self {
            occurrence_id,
            score,
        })
    }
}

/// Filters for `GET /ocorrencias/search`, unset filters are not sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OccurrenceSearch {
    pub protocol: Option<String>,
    pub kind: Option<OccurrenceKind>,
    pub status: Option<RecordStatus>,
    pub sector: Option<String>,
}

impl OccurrenceSearch {
    /// Search by protocol number
    pub fn by_protocol(protocol: &str) -> Self {
        Self {
            protocol: Some(protocol.to_string()),
            ..Default::default()
        }
    }

    /// Query string pairs for the filters that are set
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(protocol) = &self.protocol {
            params.push(("protocolo", protocol.clone()));
        }
        if let Some(kind) = self.kind {
            params.push(("tipo", kind.as_str().to_string()));
        }
        // An unknown status cannot be filtered on
        if let Some(status) = self.status.filter(|s| *s != RecordStatus::Unknown) {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(sector) = &self.sector {
            params.push(("setor", sector.clone()));
        }
        params
    }
}
