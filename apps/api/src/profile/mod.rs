// Thin profile CRUD backing registration and the profile page.

pub mod handlers;
pub mod repo;
