//! Provisioning Bounded Context
//!
//! Requests and results for creating a campaign bundle:
//! budget → campaign → optional asset group → optional feed link.
//!
//! # Key Concepts
//!
//! - **ProvisioningRequest**: Validated, typed input for one bundle
//! - **ProvisionedResourceSet**: Ordered, append-only record of created resources
//! - **ProvisioningOutcome**: Dry-run simulation or a finished (possibly partial) report

mod adjustment;
mod errors;
mod request;
mod result;
mod value_objects;

pub use adjustment::{AdjustmentType, BudgetAdjustment};
pub use errors::ProvisioningError;
pub use request::{ProvisioningRequest, ResumeFrom};
pub use result::{
    ProvisionedResource, ProvisionedResourceSet, ProvisioningOutcome, ProvisioningReport,
    ProvisioningState, StepFailure,
};
pub use value_objects::{BudgetInput, CampaignStatus, DateRange, FeedLink, ProvisioningStep};
