pub mod tuple;
pub mod checker;
pub mod relationship_store;
pub mod graph_types;
pub mod graph_builder;
pub mod graph_cache;
pub mod graph_checker;

pub use tuple::RelationshipTuple;
pub use checker::PermissionChecker;
pub use relationship_store::RelationshipStore;
pub use graph_types::{EntityType, GraphNode, RelationshipEdge};
pub use graph_builder::AuthorizationGraph;
pub use graph_cache::GraphCache;
pub use graph_checker::GraphPermissionChecker;
