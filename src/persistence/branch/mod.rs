mod entity;

pub(crate) use entity::{
    ActiveModel as BranchActiveModel, Column as BranchColumn, Entity as BranchEntity,
    Model as BranchModel,
};
