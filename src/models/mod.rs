mod dataset;
mod record;

pub use dataset::Dataset;
pub use record::{Column, Record};
