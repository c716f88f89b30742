pub mod seed_data;

pub use seed_data::*;
