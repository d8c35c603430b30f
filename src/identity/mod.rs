pub mod device;
pub mod storage;

pub use device::*;
pub use storage::*;
