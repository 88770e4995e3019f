pub mod clock;
pub mod config;
pub mod day;
pub mod errors;
pub mod models;
pub mod quotes;
pub mod roadmap;
pub mod stats;
pub mod storage;
pub mod store;
pub mod state;
pub mod timer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use day::{local_date_str, Day};
pub use errors::AppError;
pub use state::AppState;
pub use store::{Mutation, Store};
pub use timer::{run_session, FocusTimer};
