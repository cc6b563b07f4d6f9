//! cinesearch command-line front end.
//!
//! `bootstrap` assembles configuration, logging and the use cases;
//! `commands` renders them for the terminal.

pub mod bootstrap;
pub mod commands;
