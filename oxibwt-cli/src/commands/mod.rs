//! Command implementations for OxiBWT CLI.

pub mod forward;
pub mod info;
pub mod inverse;
pub mod verify;

pub use forward::cmd_forward;
pub use info::cmd_info;
pub use inverse::cmd_inverse;
pub use verify::cmd_verify;
