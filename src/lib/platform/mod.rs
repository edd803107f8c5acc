//! Servers and their cores.

mod core;
mod server;

pub use self::core::Core;
pub use self::server::Server;
