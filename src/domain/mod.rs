pub mod changelog;
pub mod commit;
pub mod message;
pub mod release;
