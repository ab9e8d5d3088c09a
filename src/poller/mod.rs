mod error;
mod poller;
mod provider;
mod types;

pub use error::PollError;
pub use poller::LivePoller;
pub use provider::{N2yoClient, PositionProvider};
pub use types::Observer;
