use crate::constants::MediaType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlRow;
use sqlx::{FromRow, Row};
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Design {
    #[serde(with = "uuid_as_string")]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    #[serde(with = "uuid_as_string")]
    pub id: Uuid,
    #[serde(with = "uuid_as_string")]
    pub ref_id: Uuid,
    pub media_type: MediaType,
    pub file_name: String,
    pub original_name: String,
    pub mime_type: String,
    pub path: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

/// A design joined with its media rows. A design without media carries an
/// empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignWithMedia {
    #[serde(flatten)]
    pub design: Design,
    pub media: Vec<Media>,
}

/// File written by the upload middleware, not yet linked to a design
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredFile {
    pub file_name: String,
    pub original_name: String,
    pub mime_type: String,
    /// Storage key, relative to the storage root
    pub path: String,
    pub size: i64,
}

/// Everything the upload middleware extracted from a multipart body
#[derive(Debug, Clone)]
pub struct UploadedMedia {
    pub media_type: MediaType,
    pub files: Vec<StoredFile>,
    pub fields: HashMap<String, String>,
}

#[derive(Debug, Clone, Validate)]
pub struct CreateDesignForm {
    #[validate(
        required(message = "name is required"),
        length(min = 1, max = 255, message = "name must be between 1 and 255 characters")
    )]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
}

impl CreateDesignForm {
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let text = |key: &str| {
            fields
                .get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            name: text("name"),
            description: text("description"),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct DeleteDesignRequest {
    #[validate(required(message = "id is required"))]
    pub id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatePictureRequest {
    pub id: Uuid,
    pub media_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SendEmailRequest {
    pub id: Uuid,
    #[validate(email(message = "to must be a valid email address"))]
    pub to: String,
    #[validate(length(max = 5000, message = "message must be at most 5000 characters"))]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendEmailResponse {
    pub sent: bool,
    pub to: String,
}

mod uuid_as_string {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use uuid::Uuid;

    pub fn serialize<S>(uuid: &Uuid, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&uuid.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Uuid::parse_str(&s).map_err(serde::de::Error::custom)
    }
}

fn uuid_column(row: &MySqlRow, column: &str) -> Result<Uuid, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    Uuid::parse_str(&raw)
        .map_err(|e| sqlx::Error::Decode(format!("Invalid UUID in {}: {}", column, e).into()))
}

impl FromRow<'_, MySqlRow> for Design {
    fn from_row(row: &MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: uuid_column(row, "id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            picture: row.try_get("picture")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl FromRow<'_, MySqlRow> for Media {
    fn from_row(row: &MySqlRow) -> Result<Self, sqlx::Error> {
        let media_type: String = row.try_get("media_type")?;
        let media_type = media_type
            .parse::<MediaType>()
            .map_err(|e| sqlx::Error::Decode(e.into()))?;

        Ok(Self {
            id: uuid_column(row, "id")?,
            ref_id: uuid_column(row, "ref_id")?,
            media_type,
            file_name: row.try_get("file_name")?,
            original_name: row.try_get("original_name")?,
            mime_type: row.try_get("mime_type")?,
            path: row.try_get("path")?,
            size: row.try_get("size")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn blank_fields_count_as_missing() {
        let form = CreateDesignForm::from_fields(&fields(&[("name", "   ")]));
        assert!(form.name.is_none());
        assert!(form.validate().is_err());
    }

    #[test]
    fn create_form_accepts_name_and_description() {
        let form = CreateDesignForm::from_fields(&fields(&[
            ("name", " Logo "),
            ("description", "Primary logo"),
        ]));
        assert!(form.validate().is_ok());
        assert_eq!(form.name(), "Logo");
    }

    #[test]
    fn create_form_rejects_long_name() {
        let long = "x".repeat(256);
        let form = CreateDesignForm::from_fields(&fields(&[("name", long.as_str())]));
        assert!(form.validate().is_err());
    }

    #[test]
    fn design_with_media_flattens_design_fields() {
        let now = Utc::now();
        let design = Design {
            id: Uuid::new_v4(),
            name: "Poster".to_string(),
            description: None,
            picture: None,
            created_at: now,
            updated_at: now,
        };
        let joined = DesignWithMedia {
            design: design.clone(),
            media: Vec::new(),
        };
        let value = serde_json::to_value(&joined).unwrap();
        assert_eq!(value["id"], design.id.to_string());
        assert_eq!(value["name"], "Poster");
        assert_eq!(value["media"], serde_json::json!([]));
    }

    #[test]
    fn send_email_request_checks_address() {
        let request = SendEmailRequest {
            id: Uuid::new_v4(),
            to: "not-an-email".to_string(),
            message: None,
        };
        assert!(request.validate().is_err());
    }
}
