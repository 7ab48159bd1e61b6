//! Shared test harness modules for the catchment CLI.

use super::*;

mod helpers;
