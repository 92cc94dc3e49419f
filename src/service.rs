pub mod authorization;
pub mod complaint_service;
pub mod dashboard_service;
pub mod error;
pub mod house_service;
pub mod occupancy;
pub mod payment_service;
pub mod resident_service;

#[cfg(test)]
mod fixtures;
