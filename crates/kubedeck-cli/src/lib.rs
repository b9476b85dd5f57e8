// Offline administration of the Kubedeck local cluster registry

pub mod cli; // Command line definition
pub mod command; // Subcommand execution
pub mod config; // Configuration loading
pub mod logging; // Console and rolling file logging
