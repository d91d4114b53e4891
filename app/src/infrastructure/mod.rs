pub mod navigator;
pub mod progress;
