pub mod entities;
pub mod repositories;
pub mod state_machine;
pub mod value_objects;
