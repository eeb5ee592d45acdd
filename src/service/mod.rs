pub mod poll_loop;
pub mod state;

pub use state::SharedRange;
