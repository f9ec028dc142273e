// Relationship-tuple authorization primitives are owned by `shared` so the
// generic permission substrate (§9 Design Notes) has one implementation, not one
// per service crate.
pub use shared::infrastructure::zanzibar::RelationshipTuple;
