pub mod keyword_scanner;
pub mod readability;
pub mod scoring;
