mod handler;
mod model;

pub use handler::{detail, index_list, list};
