pub mod camera;
pub mod client;
pub mod json_lines;
pub mod position;
pub mod server;

/// Speed limits and speeds on the readout, in miles per hour.
pub type Limit = u16;
