//! Weekly trigger for the full kanban rebuild.
//!
//! [`WeeklySchedule`] computes fire times; [`Scheduler`] runs the loop on a
//! background task and stops when asked through a watch channel.

mod cadence;
mod runner;

pub use cadence::WeeklySchedule;
pub use runner::Scheduler;

#[cfg(test)]
mod tests;
