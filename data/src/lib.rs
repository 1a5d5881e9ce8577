pub mod config;
pub mod timeline;

pub use timeline::{Dataset, DatasetError, InvalidInput};
