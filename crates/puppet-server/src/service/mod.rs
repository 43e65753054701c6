pub mod director;
pub mod error;
pub mod library;
