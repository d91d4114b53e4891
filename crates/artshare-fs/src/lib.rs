pub mod io;

pub use io::{atomic_write_private, atomic_write_str, read_optional};
