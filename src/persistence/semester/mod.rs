mod entity;

pub(crate) use entity::{
    ActiveModel as SemesterActiveModel, Column as SemesterColumn, Entity as SemesterEntity,
    Model as SemesterModel,
};
