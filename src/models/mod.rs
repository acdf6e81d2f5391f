pub mod ground_station;
pub mod macros;
pub mod satellite;
pub mod slot;
pub mod target;
pub mod windows;

pub use ground_station::*;
pub use satellite::*;
pub use slot::*;
pub use target::*;
pub use windows::*;
