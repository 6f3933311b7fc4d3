use crate::entities::grades::GradeEntity;

/// Which side of the offer is authoring the grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeParty {
    Owner,
    Master,
}

/// Result of attaching a grade to an offer slot inside the write transaction.
/// The slot re-check runs inside the transaction so a concurrent duplicate
/// surfaces as `SlotTaken` instead of a second row.
#[derive(Debug, Clone)]
pub enum AttachGradeOutcome {
    Attached(GradeEntity),
    SlotTaken,
}
