mod handler;
mod model;

pub use handler::{detail, list};
