pub mod building_report;
pub mod elevator_status;
pub mod trip;
