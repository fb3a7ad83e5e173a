//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod bulk_status;
mod error;
mod link_feed;
mod provision_campaign;
mod run_query;
mod set_ratio_target;
mod update_budget;

pub use bulk_status::BulkStatusUseCase;
pub use error::UseCaseError;
pub use link_feed::{
    FeedLinkResult, LINK_FEED_OPERATION, LinkFeedOutcome, LinkFeedRequest, LinkFeedUseCase,
};
pub use provision_campaign::{PROVISION_OPERATION, ProvisionCampaignUseCase};
pub use run_query::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, QueryResult, RUN_QUERY_OPERATION, RunQueryRequest,
    RunQueryUseCase,
};
pub use set_ratio_target::{
    RatioTargetResult, SET_RATIO_TARGET_OPERATION, SetRatioTargetOutcome, SetRatioTargetRequest,
    SetRatioTargetUseCase,
};
pub use update_budget::{
    BudgetUpdateResult, UPDATE_BUDGET_OPERATION, UpdateBudgetOutcome, UpdateBudgetRequest,
    UpdateBudgetUseCase,
};
