//! 预导入模块，方便使用

pub use super::achievements::{
    ActiveModel as AchievementActiveModel, Entity as Achievements, Model as AchievementModel,
};
pub use super::admins::{ActiveModel as AdminActiveModel, Entity as Admins, Model as AdminModel};
pub use super::files::{ActiveModel as FileActiveModel, Entity as Files, Model as FileModel};
pub use super::jobs::{ActiveModel as JobActiveModel, Entity as Jobs, Model as JobModel};
pub use super::teachers::{
    ActiveModel as TeacherActiveModel, Entity as Teachers, Model as TeacherModel,
};
