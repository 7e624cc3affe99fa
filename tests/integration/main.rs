//! Integration tests for branchplay

mod cli_test;
mod config_test;
mod helpers;
mod scenario_test;
