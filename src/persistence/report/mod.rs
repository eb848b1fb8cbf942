mod entity;

pub(crate) use entity::{
    ActiveModel as ReportActiveModel, Column as ReportColumn, Entity as ReportEntity,
    Model as ReportModel, ReportReason,
};
