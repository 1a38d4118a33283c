pub mod ports;
pub mod range;
pub mod target;

pub use ports::PortSpec;
pub use target::Target;
