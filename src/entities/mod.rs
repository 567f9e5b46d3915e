pub mod availability;
pub mod booking;
pub mod parking_spot;
pub mod rating;
pub mod user;
