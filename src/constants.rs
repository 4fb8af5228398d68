use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Categories of uploaded media. The identifier doubles as the multipart
/// field name the files are sent under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Design,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Design => "design",
        }
    }

    /// Multipart field that carries files of this type
    pub fn field_name(&self) -> &'static str {
        self.as_str()
    }

    pub fn allowed_mime_types(&self) -> &'static [&'static str] {
        match self {
            MediaType::Design => &[
                "image/png",
                "image/jpeg",
                "image/gif",
                "image/webp",
                "image/svg+xml",
                "application/pdf",
            ],
        }
    }

    pub fn accepts(&self, mime_type: &str) -> bool {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        self.allowed_mime_types().contains(&essence.as_str())
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("design") {
            Ok(MediaType::Design)
        } else {
            Err(format!("unknown media type: {}", s))
        }
    }
}
