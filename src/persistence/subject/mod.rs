mod entity;

pub(crate) use entity::{
    ActiveModel as SubjectActiveModel, Column as SubjectColumn, Entity as SubjectEntity,
    Model as SubjectModel,
};
