pub mod active_talk_repository;
pub mod enquete_repository;

pub use active_talk_repository::*;
pub use enquete_repository::*;
