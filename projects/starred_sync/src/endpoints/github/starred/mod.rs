pub mod read_state;
pub mod sync;
