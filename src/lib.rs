pub mod args;
pub mod config;
pub mod elements;
pub mod prompts;
pub mod providers;
pub mod retry;
pub mod scrape;
pub mod scripts;
pub mod table;
pub mod testcases;
pub mod theme;

// Re-export the stage artifact types at crate root for convenience
pub use elements::ElementListing;
pub use scripts::ScriptRow;
pub use testcases::TestCase;
