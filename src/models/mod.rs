//! Data models for the Bookclub API

pub mod author;
pub mod book;
pub mod review;
pub mod user;
