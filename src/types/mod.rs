pub mod app_state;
pub mod coordinate;
pub mod direction_summary;
pub mod place_candidate;
