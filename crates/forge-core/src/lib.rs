pub mod job;
pub mod snapshot;
pub mod status;

pub use job::{CloneJob, JobError, ProgramType};
pub use snapshot::{CardioSnapshot, SnapshotError, StrengthSnapshot};
pub use status::{CloneProgress, CopyStatus, StatusParseError};
