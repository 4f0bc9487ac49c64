pub mod json_file;
pub mod memory;

pub use json_file::*;
pub use memory::*;
