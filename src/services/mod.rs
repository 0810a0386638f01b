pub mod audit;
pub mod availability;
pub mod booking;
pub mod orchestrator;
pub mod payment;
pub mod summary;
