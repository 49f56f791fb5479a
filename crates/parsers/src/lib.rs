//! Adapters from collaborator record shapes to the canonical `RawSession`.
//!
//! Every source API names its fields differently (`phone` vs `phone_number`,
//! `user_email` vs `email`, live vs replay attendance pairs). Each adapter
//! module maps exactly one source shape onto the canonical model at the
//! boundary, so the pipeline never sees platform-specific keys.

pub mod csv_file;
pub mod webinarjam;
pub mod zoom;
