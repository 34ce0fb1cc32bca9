pub mod gutenberg;
pub mod html;
pub mod markdown;
pub mod sections;
