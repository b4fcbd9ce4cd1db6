pub mod types;

pub use types::BouncerError;
