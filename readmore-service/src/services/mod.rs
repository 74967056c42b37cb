pub mod aggregate;
pub mod cache;
pub mod catalog;
pub mod normalize;
pub mod ranking;
pub mod recommend;
pub mod scoring;
