//! Types for complaints

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::status::RecordStatus;

/// A categorized report of a failing public service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    /// The complaint ID
    pub id: i64,

    /// Server-assigned tracking number
    #[serde(rename = "protocolo")]
    pub protocol: String,

    #[serde(rename = "descricao")]
    pub description: String,

    #[serde(rename = "data")]
    pub date: NaiveDate,

    #[serde(rename = "endereco")]
    pub address: String,

    /// Geocoordinate as `"lat,lng"`
    #[serde(rename = "localizacao", default)]
    pub location: Option<String>,

    /// Base64 encoded photo
    #[serde(rename = "imagem", default)]
    pub image: Option<String>,

    pub status: RecordStatus,

    #[serde(rename = "categoria_id")]
    pub category_id: i64,

    #[serde(rename = "usuario_id")]
    pub user_id: i64,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Complaint {
    /// Decode the attached photo, if any
    pub fn image_bytes(&self) -> Result<Option<Vec<u8>>, Error> {
        self.image
            .as_deref()
            .map(|encoded| {
                // Strip a data URL prefix such as `data:image/jpeg;base64,`
                let raw = encoded.rsplit_once(',').map_or(encoded, |(_, data)| data);
                BASE64
                    .decode(raw)
                    .map_err(|e| Error::invalid_input(format!("image is not valid base64: {e}")))
            })
            .transpose()
    }
}

/// Payload for submitting a complaint
#[derive(Debug, Clone, Serialize)]
pub struct NewComplaint {
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "endereco")]
    pub address: String,
    #[serde(rename = "localizacao", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "imagem", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "categoria_id")]
    pub category_id: i64,
    #[serde(rename = "usuario_id")]
    pub user_id: i64,
}

impl NewComplaint {
    /// Create a complaint without location or photo
    pub fn new(
        description: &str,
        date: NaiveDate,
        address: &str,
        category_id: i64,
        user_id: i64,
    ) -> Self {
        Self {
            description: description.to_string(),
            date,
            address: address.to_string(),
            location: None,
            image: None,
            category_id,
            user_id,
        }
    }

    /// Geotag the complaint
    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.location = Some(format!("{latitude},{longitude}"));
        self
    }

    /// Attach a photo, encoded as base64
    pub fn with_image(mut self, bytes: &[u8]) -> Self {
        self.image = Some(BASE64.encode(bytes));
        self
    }
}

/// Editable complaint fields
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComplaintUpdate {
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "endereco", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "localizacao", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "imagem", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "categoria_id", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_complaint_encodes_location_and_image() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let complaint = NewComplaint::new("Buraco na via", date, "Rua A, 10", 3, 1)
            .with_location(-3.7319, -38.5267)
            .with_image(b"jpeg");

        let value = serde_json::to_value(&complaint).unwrap();
        assert_eq!(value["localizacao"], "-3.7319,-38.5267");
        assert_eq!(value["imagem"], "anBlZw==");
        assert_eq!(value["data"], "2024-03-05");
        assert!(value.get("protocolo").is_none());
    }

    #[test]
    fn image_bytes_accepts_data_urls() {
        let complaint: Complaint = serde_json::from_value(json!({
            "id": 9,
            "protocolo": "2024000009",
            "descricao": "Lâmpada queimada",
            "data": "2024-03-05",
            "endereco": "Praça B",
            "imagem": "data:image/jpeg;base64,anBlZw==",
            "status": "aberta",
            "categoria_id": 2,
            "usuario_id": 1
        }))
        .unwrap();

        assert_eq!(complaint.image_bytes().unwrap(), Some(b"jpeg".to_vec()));
        assert!(complaint.created_at.is_none());
    }
}
