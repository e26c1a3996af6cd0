//! Route-guard state machine.
//!
//! Navigation states are recomputed from identity/profile facts on every
//! request — there is no stored session state machine. The decision function
//! is pure; the service's guard middleware resolves the facts and applies
//! the resulting redirect.

/// Navigation state of the requesting principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    Anonymous,
    EmailUnconfirmed,
    PendingApproval,
    Active,
}

/// Gate facts read from the identity and profile rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateFacts {
    pub email_confirmed: bool,
    pub approved: bool,
}

impl AccessState {
    /// Resolve the navigation state from the request's gate facts.
    ///
    /// `None` means no authenticated identity. A confirmed identity whose
    /// profile row does not exist yet resolves to `PendingApproval` via
    /// `approved = false` — the waiting-approval page hosts lazy profile
    /// creation.
    pub fn resolve(facts: Option<GateFacts>) -> Self {
        match facts {
            None => Self::Anonymous,
            Some(f) if !f.email_confirmed => Self::EmailUnconfirmed,
            Some(f) if !f.approved => Self::PendingApproval,
            Some(_) => Self::Active,
        }
    }
}

/// Classified navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    Root,
    Login,
    Signup,
    VerifyEmail,
    WaitingApproval,
    Protected,
}

/// Outcome of guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    ToLogin,
    ToVerifyEmail,
    ToWaitingApproval,
    ToDashboard,
}

/// Decide what to do with a navigation to `target` in `state`.
///
/// The root page is always reachable. Login/signup bounce active users to
/// the dashboard. Each pending state owns exactly one reachable status page;
/// every other target redirects there.
pub fn route_decision(state: AccessState, target: RouteTarget) -> RouteDecision {
    use AccessState::*;
    use RouteTarget::*;

    match (state, target) {
        (_, Root) => RouteDecision::Allow,
        (Active, Login | Signup) => RouteDecision::ToDashboard,
        (_, Login | Signup) => RouteDecision::Allow,
        (Anonymous, _) => RouteDecision::ToLogin,
        (EmailUnconfirmed, VerifyEmail) => RouteDecision::Allow,
        (EmailUnconfirmed, _) => RouteDecision::ToVerifyEmail,
        (PendingApproval, WaitingApproval) => RouteDecision::Allow,
        (PendingApproval, _) => RouteDecision::ToWaitingApproval,
        (Active, _) => RouteDecision::Allow,
    }
}
