mod entity;

pub(crate) use entity::{
    ActiveModel as RatingActiveModel, Column as RatingColumn, Entity as RatingEntity,
};
