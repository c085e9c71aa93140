pub mod read_snapshot;
pub mod replay_opts;
