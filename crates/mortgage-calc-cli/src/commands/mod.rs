pub mod eligibility;
pub mod payment;
pub mod programs;
pub mod schedule;
pub mod sensitivity;
