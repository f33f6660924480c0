pub mod careerdtos;
pub mod catalogdtos;
pub mod chatdtos;
pub mod contactdtos;
pub mod userdtos;
