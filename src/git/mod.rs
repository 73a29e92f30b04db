pub mod clone;
pub mod repo;

pub use clone::clone_repository;
pub use repo::{ExtractOptions, GitRepo};
