//! Seoul subway arrivals and timetables server.
//!
//! Answers "which train do I take from here to there, and when is the next
//! one?" over the Seoul network: line and direction resolution on a static
//! topology, real-time arrival boards, and station timetables from two
//! schedule providers.

pub mod board;
pub mod cache;
pub mod config;
pub mod provider;
pub mod realtime;
pub mod route;
pub mod schedule;
pub mod topology;
pub mod web;
