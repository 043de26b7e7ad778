pub mod climate;
pub mod energy;
pub mod region;
pub mod weather;

pub use climate::*;
pub use energy::*;
pub use region::*;
pub use weather::*;
