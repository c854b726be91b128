mod connection;
mod driver;
mod extract;
mod handle;
mod sql_writer;

pub use connection::*;
pub use driver::*;
pub use handle::*;
pub use sql_writer::*;
