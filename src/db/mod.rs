pub mod connection;
pub mod models;
pub mod repositories;
pub mod source;

pub use connection::*;
pub use models::*;
pub use repositories::*;
pub use source::*;
