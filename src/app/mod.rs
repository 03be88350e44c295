// Application layer: wiring between the CLI surface and the repository.

#[cfg(feature = "cli")]
pub mod commands;
