pub mod buffer;
pub mod commands;
pub mod editor;
pub mod piece_table;
pub mod viewport;

pub use buffer::*;
pub use editor::*;
pub use piece_table::*;
pub use viewport::*;
