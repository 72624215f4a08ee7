pub mod resolver;
pub mod soc_code;
