mod entity;

pub(crate) use entity::{
    ActiveModel as SessionActiveModel, Column as SessionColumn, Entity as SessionEntity,
    Model as SessionModel,
};
