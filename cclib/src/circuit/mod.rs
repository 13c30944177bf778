//! The zk-SNARK circuit layer (spec §4.5): constraints are built against an abstract
//! [`ConstraintSystem`] so the same builder serves both proving and verifying (the concrete
//! proving-system backend is out of scope per spec §1 Non-goals; see `cclib::keys` for the
//! proof-key side of the boundary).

mod bless;
mod constraint_system;
mod tx_circuit;

pub use bless::BlessSchedule;
pub use constraint_system::{ConstraintSystem, RecordingCs};
pub use tx_circuit::synthesize;
