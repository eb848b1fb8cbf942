use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum UploadType {
    #[sea_orm(string_value = "NOTES")]
    #[serde(rename = "NOTES")]
    Notes,
    #[sea_orm(string_value = "SPECTRUM")]
    #[serde(rename = "SPECTRUM")]
    Spectrum,
    #[sea_orm(string_value = "PYQ")]
    #[serde(rename = "PYQ")]
    Pyq,
    #[sea_orm(string_value = "IMP")]
    #[serde(rename = "IMP")]
    Imp,
}

impl UploadType {
    pub const ALL: [UploadType; 4] = [Self::Notes, Self::Spectrum, Self::Pyq, Self::Imp];

    pub fn code(self) -> &'static str {
        match self {
            Self::Notes => "NOTES",
            Self::Spectrum => "SPECTRUM",
            Self::Pyq => "PYQ",
            Self::Imp => "IMP",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Notes => "Notes",
            Self::Spectrum => "Spectrum",
            Self::Pyq => "Previous Year Questions",
            Self::Imp => "Important Questions",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == raw.trim())
    }
}

/// Moderation state. Uploads start `Unverified`; only staff move them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum UploadStatus {
    #[sea_orm(string_value = "UNVERIFIED")]
    #[serde(rename = "UNVERIFIED")]
    Unverified,
    #[sea_orm(string_value = "VERIFIED")]
    #[serde(rename = "VERIFIED")]
    Verified,
    #[sea_orm(string_value = "REMOVED")]
    #[serde(rename = "REMOVED")]
    Removed,
}

impl UploadStatus {
    pub fn code(self) -> &'static str {
        match self {
            Self::Unverified => "UNVERIFIED",
            Self::Verified => "VERIFIED",
            Self::Removed => "REMOVED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unverified => "Unverified",
            Self::Verified => "Verified",
            Self::Removed => "Removed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "uploads")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i32,
    pub uploader_id: i32,
    pub subject_id: i32,
    pub title: String,
    pub description: String,
    /// Name of the stored blob inside the file storage directory.
    #[serde(skip_serializing)]
    pub file_ref: String,
    pub original_filename: String,
    pub mime_type: Option<String>,
    pub byte_size: i64,
    pub file_sha256: String,
    pub upload_type: UploadType,
    pub status: UploadStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
