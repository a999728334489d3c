//! Shared test harness modules for the nodeloc CLI.

use super::*;

mod helpers;
