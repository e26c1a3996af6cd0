//! Access policy evaluator.
//!
//! A pure function over (requester, resource, action). Callers resolve the
//! relationship facts (course links, ownership, schedule status) before
//! evaluation; the policy itself never touches the database.

use uuid::Uuid;

use crate::role::Role;

/// Action requested on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

/// Resource under evaluation, carrying the relationship facts the caller
/// resolved for the requesting user.
///
/// `linked` means: for a teacher, a course-teacher link exists for the
/// resource's course; for a student, a course-student enrollment exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Course {
        linked: bool,
    },
    CompetencyUnit {
        linked: bool,
    },
    CompetencyElement {
        linked: bool,
    },
    Evaluation {
        teacher_id: Uuid,
        student_id: Uuid,
        linked: bool,
    },
    Submission {
        student_id: Uuid,
        schedule_open: bool,
    },
    Profile {
        owner_id: Uuid,
    },
}

/// Requester identity and gate facts, resolved per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessContext {
    pub user_id: Uuid,
    pub role: Role,
    pub approved: bool,
    pub email_confirmed: bool,
}

/// Decide whether `ctx` may perform `action` on `resource`.
///
/// Precedence:
/// 1. admin allows everything (including while unapproved — admins are
///    pre-provisioned, never self-served);
/// 2. the global gate denies everything for unconfirmed or unapproved users;
/// 3. role rules below;
/// 4. absence of a matching allow rule is denial.
pub fn can_access(ctx: &AccessContext, resource: &Resource, action: Action) -> bool {
    if ctx.role == Role::Admin {
        return true;
    }
    if !ctx.email_confirmed || !ctx.approved {
        return false;
    }

    match ctx.role {
        Role::Admin => unreachable!("admin handled above"),
        Role::Teacher => teacher_rule(ctx, resource, action),
        Role::Student => student_rule(ctx, resource, action),
    }
}

fn teacher_rule(ctx: &AccessContext, resource: &Resource, action: Action) -> bool {
    match resource {
        Resource::Course { linked }
        | Resource::CompetencyUnit { linked }
        | Resource::CompetencyElement { linked } => match action {
            Action::Read => *linked,
            Action::Create | Action::Update | Action::Delete => *linked,
        },
        Resource::Evaluation {
            teacher_id, linked, ..
        } => match action {
            // Own evaluations are readable directly by teacher_id match —
            // same result as the transitive course-link path, cheaper to
            // resolve.
            Action::Read => *linked || *teacher_id == ctx.user_id,
            Action::Create | Action::Update | Action::Delete => {
                *linked && *teacher_id == ctx.user_id
            }
        },
        // Teachers reach submissions only through evaluations, never as a
        // direct resource.
        Resource::Submission { .. } => false,
        Resource::Profile { owner_id } => {
            matches!(action, Action::Read | Action::Update) && *owner_id == ctx.user_id
        }
    }
}

fn student_rule(ctx: &AccessContext, resource: &Resource, action: Action) -> bool {
    match resource {
        Resource::Course { linked }
        | Resource::CompetencyUnit { linked }
        | Resource::CompetencyElement { linked } => matches!(action, Action::Read) && *linked,
        Resource::Evaluation { student_id, .. } => {
            matches!(action, Action::Read) && *student_id == ctx.user_id
        }
        Resource::Submission {
            student_id,
            schedule_open,
        } => match action {
            Action::Read => *student_id == ctx.user_id,
            Action::Create => *student_id == ctx.user_id && ctx.approved && *schedule_open,
            Action::Update | Action::Delete => false,
        },
        Resource::Profile { owner_id } => {
            matches!(action, Action::Read | Action::Update) && *owner_id == ctx.user_id
        }
    }
}
