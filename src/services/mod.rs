pub mod catalog;
pub mod filter;
pub mod parser;
pub mod prompt;
pub mod providers;
pub mod recommendations;

pub use catalog::Catalog;
pub use providers::{GroqClient, ModelClient, ModelSettings};
