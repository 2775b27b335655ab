pub mod aggregator;
pub mod crawler;
pub mod listing;
pub mod web;
pub mod workers;

#[cfg(test)]
pub(crate) mod testing;
