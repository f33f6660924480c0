pub mod admin;
pub mod auth;
pub mod careers;
pub mod catalog;
pub mod chat;
pub mod contact;
pub mod users;
