pub mod config;
pub mod load_data;
pub mod run;
