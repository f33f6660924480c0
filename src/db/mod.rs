pub mod careerdb;
pub mod catalogdb;
pub mod chatdb;
pub mod contactdb;
pub mod dashboarddb;
#[allow(clippy::module_inception)]
pub mod db;
pub mod userdb;
