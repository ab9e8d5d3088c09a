pub mod elements;
pub mod passes;
pub mod telemetry;
mod window;

pub use window::HoursWindow;
