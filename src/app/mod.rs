pub mod content;
pub mod pages;
pub mod repos;
pub mod serialize;
