pub mod path;
pub mod testing;
