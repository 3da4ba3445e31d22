pub(crate) mod browse;
pub(crate) mod data;
pub(crate) mod reports;
