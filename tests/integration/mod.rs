//! Integration tests for the lazy-loading tree view

mod cli_contracts;
mod persistence;
mod support;
mod tree_scenarios;
