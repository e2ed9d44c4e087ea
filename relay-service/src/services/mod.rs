pub mod error;
pub mod providers;
pub mod relay;

pub use error::RelayError;
pub use relay::MessageRelay;
