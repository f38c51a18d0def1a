pub mod changelog;
pub mod commit_range;
pub mod prompts;
pub mod summarize;
#[cfg(test)]
pub mod testing;
