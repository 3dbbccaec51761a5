pub mod directions_report;
pub mod input_acquisition;
pub mod nearby_place;
