pub mod config_io;
pub mod http;
pub mod logging;
pub mod persist;
pub mod remote;
pub mod state;
