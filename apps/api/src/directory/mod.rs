// Company directory: industries, companies per industry, company detail.

pub mod handlers;
pub mod repo;
