pub mod error;

pub use error::{handle_domain_error, json_config, status_for};
