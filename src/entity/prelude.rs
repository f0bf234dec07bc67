//! 预导入模块，方便使用

pub use super::metrics::{
    ActiveModel as MetricActiveModel, Entity as Metrics, Model as MetricModel,
};
pub use super::photos::{ActiveModel as PhotoActiveModel, Entity as Photos, Model as PhotoModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
pub use super::votes::{ActiveModel as VoteActiveModel, Entity as Votes, Model as VoteModel};
