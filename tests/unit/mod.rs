pub mod config_tests;
pub mod error_tests;
pub mod naming_tests;
pub mod reader_tests;
pub mod workspace_tests;
