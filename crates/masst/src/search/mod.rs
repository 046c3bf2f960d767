pub mod command;
pub use command::{SearchCommand, SearchQuery};
pub mod params;
pub use params::SearchParams;

#[cfg(test)]
mod tests;
