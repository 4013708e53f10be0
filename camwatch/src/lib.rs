pub mod banner;
pub mod dataset;
pub mod follow;
pub mod proximity;
pub mod session;
pub mod settings;
pub mod speed;
pub mod tracker;
