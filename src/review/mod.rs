pub mod controller;
pub mod state;

pub use controller::ReviewController;
pub use state::{ActivityComparison, ReviewSnapshot, ReviewState, ReviewStatus, ReviewStatusReport};
