//! Cache module for pending verification records
//!
//! Records live in process memory only; a restart drops every pending code.

pub mod code_store;

#[cfg(test)]
mod tests;

pub use code_store::InMemoryCodeStore;
