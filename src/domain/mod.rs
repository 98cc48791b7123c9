// Domain layer - Core models with no I/O
pub mod chart;
pub mod target;
pub mod telemetry;
pub mod time_window;
