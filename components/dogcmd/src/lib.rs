//! `dogcmd` turns a flat list of command line tokens such as
//! `gauge foo 1 incr bar sleep 500ms flush` into metric submissions.
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod cli;
pub mod client;
pub mod helpers;
pub mod instrumentation;
pub mod interpreter;
