pub mod add_holiday;
pub mod generate;
pub mod remove_holiday;
