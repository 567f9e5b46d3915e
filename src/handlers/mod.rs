pub mod admin;
pub mod auth;
pub mod owner;
pub mod profile;
pub mod ratings;
pub mod renter;
