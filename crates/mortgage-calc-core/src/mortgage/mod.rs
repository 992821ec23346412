//! Residential mortgage payment calculator.
//!
//! A [`scenario::LoanScenario`] describes the purchase and loan terms; the
//! [`calculator`] turns it into a monthly [`calculator::PaymentBreakdown`]
//! using the level-payment formula, the [`insurance`] rule tables and simple
//! escrow splits. [`schedule`] expands the same loan into a month-by-month
//! amortisation table.

pub mod calculator;
pub mod insurance;
pub mod scenario;
pub mod schedule;
