/// Unit test suite entry point

mod local_store_tests;
