pub mod book;
pub mod jwt;
