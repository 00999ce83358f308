pub mod chat;
pub mod contact;
pub mod health;
pub mod models;
pub mod page;
pub mod suggestions;
