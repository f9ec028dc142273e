#[path = "domain/entities/relationship.rs"]
mod relationship;
