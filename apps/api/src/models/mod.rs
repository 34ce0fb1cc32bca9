pub mod article;
pub mod translation;
pub mod website;
