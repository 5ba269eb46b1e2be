//! Web layer.
//!
//! JSON endpoints over route resolution, real-time boards and timetables.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, ArrivalBoards, Schedules};
