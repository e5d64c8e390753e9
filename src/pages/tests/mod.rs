pub(crate) mod fake_browser;
mod interactive_tests;
