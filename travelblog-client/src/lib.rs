pub mod client;
pub mod error;
pub mod models;

pub use client::{SearchParams, TravelBlogClient};
pub use error::ClientError;
