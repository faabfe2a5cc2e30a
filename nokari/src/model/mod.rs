pub mod channel;
pub mod guild;
pub mod id;
pub mod interaction;
pub mod permissions;
pub mod user;

mod channel_impl;
mod guild_impl;
mod user_impl;
