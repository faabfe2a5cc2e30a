pub mod bot;
pub mod builder;
pub mod model;
pub mod util;
