pub mod careermodels;
pub mod catalogmodels;
pub mod chatmodels;
pub mod contactmodels;
pub mod usermodel;
