mod entity;

pub(crate) use entity::{
    ActiveModel as PointsLogActiveModel, Column as PointsLogColumn, Entity as PointsLogEntity,
    Model as PointsLogModel,
};
