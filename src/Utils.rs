//! different utility modules used throughout the project
/// tiny module to set up terminal logging for the limit engine
pub mod logger;
