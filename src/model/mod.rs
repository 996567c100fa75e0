pub mod config;
pub mod status;
pub mod task;
pub mod user;

pub use config::*;
pub use status::*;
pub use task::*;
pub use user::*;
