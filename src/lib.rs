pub mod core;
pub mod io;
pub mod processing;
pub mod service;
