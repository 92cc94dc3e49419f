pub mod auth;
pub mod complaints;
pub mod dashboard;
pub mod houses;
pub mod payments;
pub mod residents;
pub mod users;
