//! Movement domain: system modules for locomotion updates.

pub(crate) mod input;
pub(crate) mod locomotion;

pub(crate) use input::read_input;
pub(crate) use locomotion::{report_missing_body, step_locomotion};
