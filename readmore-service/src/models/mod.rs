pub mod book;
pub mod profile;
pub mod requests;
pub mod responses;
