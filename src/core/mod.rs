//! Core module - Schedule engine
//!
//! Sets, the schedule that merges them, and its projections (rows, daily
//! agenda, calendar) and persistence.

pub mod agenda;
pub mod calendar;
pub mod date;
pub mod error;
pub mod rows;
pub mod schedule;
pub mod set;
pub mod storage;
