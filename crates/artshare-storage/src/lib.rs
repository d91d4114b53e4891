pub mod config;
pub mod file;

pub use config::StorageConfig;
pub use file::FileSessionStorage;
