pub mod error;
pub mod live;
pub mod passes;
pub mod satellites;
pub mod telemetry;
pub mod transfer;
