pub mod context;
pub mod setup;
pub mod screening_engine;
pub mod emr_sync;
pub mod phi_filter;
pub mod prep_sheet;
pub mod audit;
