mod entity;

pub(crate) use entity::{
    ActiveModel as UploadActiveModel, Column as UploadColumn, Entity as UploadEntity,
    Model as UploadModel, UploadStatus, UploadType,
};
