pub mod engine;
pub mod handle_replay;
pub mod snapshot;
pub mod status;
pub mod track;
