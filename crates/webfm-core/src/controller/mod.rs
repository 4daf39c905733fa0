//! Workflow orchestration.
//!
//! Controllers sit between the models in [`crate::nav`] and the
//! [`FileService`](crate::remote::FileService). Each workflow catches its
//! failures at the boundary, reports exactly one notification, leaves the
//! previous state untouched, and still returns the [`CoreResult`] so the
//! caller can inspect it.
//!
//! [`CoreResult`]: crate::error::CoreResult

pub mod batch;
pub mod busy;
pub mod directory;

pub use batch::{
    BatchOperationController, BatchReport, ConfirmGate, DestinationChoice, DestinationPicker,
    OperationKind, TransferAction,
};
pub use busy::{BusyScope, BusyState};
pub use directory::{DirectoryController, LoadOutcome, LoadTicket};
