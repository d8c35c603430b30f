mod active_poll;
pub mod notify;
pub mod rows;
mod source;

pub use active_poll::*;
pub use notify::*;
pub use rows::*;
pub use source::*;
