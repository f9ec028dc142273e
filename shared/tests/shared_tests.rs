#[path = "shared/masking.rs"]
mod masking;
