pub mod availability;
pub mod gravatar;
pub mod jwt;
pub mod payment;
pub mod rating;
