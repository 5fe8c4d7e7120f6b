/// Integration test suite entry point

mod remote_tests;
mod support;
