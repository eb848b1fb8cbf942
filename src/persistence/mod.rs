mod branch;
mod points_log;
mod rating;
mod report;
mod semester;
mod session;
mod subject;
mod upload;
mod user;

pub(crate) use crate::persistence::branch::{
    BranchActiveModel, BranchColumn, BranchEntity, BranchModel,
};
pub(crate) use crate::persistence::points_log::{
    PointsLogActiveModel, PointsLogColumn, PointsLogEntity, PointsLogModel,
};
pub(crate) use crate::persistence::rating::{RatingActiveModel, RatingColumn, RatingEntity};
pub(crate) use crate::persistence::report::{
    ReportActiveModel, ReportColumn, ReportEntity, ReportModel, ReportReason,
};
pub(crate) use crate::persistence::semester::{
    SemesterActiveModel, SemesterColumn, SemesterEntity, SemesterModel,
};
pub(crate) use crate::persistence::session::{
    SessionActiveModel, SessionColumn, SessionEntity, SessionModel,
};
pub(crate) use crate::persistence::subject::{
    SubjectActiveModel, SubjectColumn, SubjectEntity, SubjectModel,
};
pub(crate) use crate::persistence::upload::{
    UploadActiveModel, UploadColumn, UploadEntity, UploadModel, UploadStatus, UploadType,
};
pub(crate) use crate::persistence::user::{UserActiveModel, UserColumn, UserEntity, UserModel};
