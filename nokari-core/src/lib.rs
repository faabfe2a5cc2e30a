pub mod check;
pub mod command;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod executor;
pub mod gateway;
pub mod help;
pub mod hook;
pub mod module;
pub mod permissions;
pub mod prefix;
pub mod prompt;
pub mod responses;
pub mod router;
pub mod state;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use nokari;
