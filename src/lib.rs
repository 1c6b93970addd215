/// Booksmith - deterministic study-book synthesis
///
/// Core library turning a topic, audience and tone into a 15-chapter book
/// outline with charts, tables and worked examples, on-demand long-form
/// chapter text, and a page-image PDF export.

pub mod config;
pub mod core;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
