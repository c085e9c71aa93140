pub mod standings_result;
pub mod time_format;
