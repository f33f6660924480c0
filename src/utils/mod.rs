pub mod password;
pub mod slug;
pub mod token;
pub mod token_generator;
