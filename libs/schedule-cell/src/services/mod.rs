pub mod availability;
pub mod blackout;
pub mod calendar;
pub mod slots;
