pub mod models;
pub use models::*;

mod sse_broadcaster;
pub use sse_broadcaster::*;

mod board_sse;

pub use board_sse::board_events_sse;
