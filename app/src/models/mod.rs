pub mod activity_log;
pub mod api_key;
pub mod audit_log;
pub mod base;
pub mod domain;
pub mod feature;
pub mod notification_preference;
pub mod organization;
pub mod payment_transaction;
pub mod permission;
pub mod plan_feature;
pub mod report;
pub mod role;
pub mod role_permission;
pub mod seat;
pub mod seat_role;
pub mod subscription;
pub mod subscription_plan;
pub mod user;
pub mod user_organization;
pub mod user_permission;
pub mod user_role;
pub mod workflow;
