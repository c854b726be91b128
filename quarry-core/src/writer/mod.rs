mod clause;
mod sql_writer;

pub use clause::*;
pub use sql_writer::*;
