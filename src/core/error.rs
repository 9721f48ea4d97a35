#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlannerError {
    #[error("invalid target date `{0}`: expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),
    #[error("{field} must be {requirement}")]
    InvalidInput {
        field: &'static str,
        requirement: &'static str,
    },
    #[error("a goal needs a name, a positive target amount and a target date")]
    IncompleteGoal,
}
