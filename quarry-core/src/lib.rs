mod connection;
mod cursor;
mod database;
mod driver;
mod error;
mod handle;
mod interceptor;
mod query;
mod schema;
mod util;
mod value;
mod writer;

pub use ::anyhow::Context as ErrorContext;
pub use connection::*;
pub use cursor::*;
pub use database::*;
pub use driver::*;
pub use error::*;
pub use handle::*;
pub use interceptor::*;
pub use query::*;
pub use schema::*;
pub use util::*;
pub use value::*;
pub use writer::*;
