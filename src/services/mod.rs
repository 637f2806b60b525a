pub mod config_log;
pub mod provisioner;

pub use config_log::*;
pub use provisioner::*;
