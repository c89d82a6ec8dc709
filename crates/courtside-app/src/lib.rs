// Library root: configuration, data providers, image lookup, and the analysis
// session, shared by the `courtside` binary and integration tests.

pub mod command;
pub mod config;
pub mod image;
pub mod provider;
pub mod session;
