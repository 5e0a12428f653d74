//! Source tags - where a record was extracted from

use serde::{Deserialize, Serialize};

/// Origin of a record
///
/// Provenance only: the tag is carried for auditing and never participates
/// in deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceTag {
    /// Structured JSON biodata endpoints (Lok Sabha / Rajya Sabha member APIs)
    BiodataApi,

    /// Wikipedia infoboxes and member pages
    Wikipedia,

    /// Election affidavits (e.g. MyNeta)
    Affidavit,

    /// Hand-entered records
    Manual,

    /// Text extracted from PDF member directories
    PdfExtract,
}

impl SourceTag {
    /// All tags, in declaration order
    pub const ALL: [SourceTag; 5] = [
        SourceTag::BiodataApi,
        SourceTag::Wikipedia,
        SourceTag::Affidavit,
        SourceTag::Manual,
        SourceTag::PdfExtract,
    ];

    /// Get the tag name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::BiodataApi => "biodata-api",
            SourceTag::Wikipedia => "wikipedia",
            SourceTag::Affidavit => "affidavit",
            SourceTag::Manual => "manual",
            SourceTag::PdfExtract => "pdf-extract",
        }
    }

    /// Parse a tag from a free-form label
    ///
    /// Accepts the canonical names plus the short labels the collection
    /// scripts write into their dumps.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "biodata-api" | "biodata" | "api" => Some(SourceTag::BiodataApi),
            "wikipedia" | "wiki" => Some(SourceTag::Wikipedia),
            "affidavit" | "myneta" => Some(SourceTag::Affidavit),
            "manual" | "manual-entry" => Some(SourceTag::Manual),
            "pdf-extract" | "pdf" => Some(SourceTag::PdfExtract),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid source tag: {}", s))
    }
}
