pub mod catalog;
pub mod company;
pub mod job;
pub mod user;
