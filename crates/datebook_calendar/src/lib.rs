// --- File: crates/datebook_calendar/src/lib.rs ---
pub mod doc;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod routes;
pub mod service;
#[cfg(test)]
mod service_test;
