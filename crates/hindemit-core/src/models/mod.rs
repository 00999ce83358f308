pub mod api;
pub mod catalog;
pub mod contact;
pub mod message;
pub mod suggestion;
