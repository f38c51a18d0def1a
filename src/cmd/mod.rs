pub mod commit;
pub mod config;
pub mod console;
pub mod generate;
