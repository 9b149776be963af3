//! Integration tests

mod helpers;

mod cli_test;
mod controller_test;
mod store_test;
