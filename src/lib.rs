pub mod api;
pub mod currency;
mod fronius;
pub mod model;

pub use api::Error;
pub use fronius::{connect, connect_with_clock, Fronius};
