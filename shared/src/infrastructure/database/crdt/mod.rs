pub mod crdt;
pub mod merge;
pub mod sync;

pub use crdt::{Crdt, CrdtType, CrdtValue, LWWRegister, ORSet};
pub use merge::MergeStrategy;
pub use sync::SyncProtocol;

