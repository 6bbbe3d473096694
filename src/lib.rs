pub mod analyzer;
pub mod catalog;
pub mod config;
pub mod data_types;
pub mod frontend;
pub mod mapping;
pub mod remote;
pub mod repository;

#[cfg(test)]
pub(crate) mod testutils;
