#[cfg(test)]
mod tests;

pub mod pipeline;
pub mod scoring_core;
