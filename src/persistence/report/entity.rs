use sea_orm::entity::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ReportReason {
    #[sea_orm(string_value = "SPAM")]
    Spam,
    #[sea_orm(string_value = "WRONG")]
    Wrong,
    #[sea_orm(string_value = "COPYRIGHT")]
    Copyright,
    #[sea_orm(string_value = "VULGAR")]
    Vulgar,
}

impl ReportReason {
    pub const ALL: [ReportReason; 4] = [Self::Spam, Self::Wrong, Self::Copyright, Self::Vulgar];

    pub fn code(self) -> &'static str {
        match self {
            Self::Spam => "SPAM",
            Self::Wrong => "WRONG",
            Self::Copyright => "COPYRIGHT",
            Self::Vulgar => "VULGAR",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Spam => "Spam",
            Self::Wrong => "Wrong Content",
            Self::Copyright => "Copyright",
            Self::Vulgar => "Vulgar/Abuse",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|reason| reason.code() == raw.trim())
    }
}

/// One row per (reporter_id, upload_id). The first report wins.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i32,
    pub reporter_id: i32,
    pub upload_id: i32,
    pub reason: ReportReason,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
