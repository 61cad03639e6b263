//! Database models

pub mod activity_log;
pub mod strategy_settings;
pub mod user;
pub mod work_item;
pub mod work_item_template;

pub use activity_log::{ActivityLog, NewActivityLog};
pub use strategy_settings::{NewStrategySettings, StrategySettings, UpdateStrategySettings};
pub use user::{User, UserRole};
pub use work_item::{NewWorkItem, WorkItemStatus};
pub use work_item_template::WorkItemTemplate;
