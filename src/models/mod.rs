pub mod labels;
pub mod query;
pub mod task;
pub mod user;

pub use task::{
    OrderDirection, Pagination, Task, TaskFilter, TaskInput, TaskMetrics, TaskOrderField, TaskPage,
    TaskPatch, TaskQuery, TaskRef, TaskStatus,
};
pub use user::{User, UserProfile, UserSummary};
