pub mod config;
pub mod record;
pub mod request;
pub mod settings;

pub use config::*;
pub use record::*;
pub use request::*;
pub use settings::*;
