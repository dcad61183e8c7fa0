pub mod aggregate;
pub mod locations;
pub mod smhi;
pub mod timeseries;
pub mod units;
