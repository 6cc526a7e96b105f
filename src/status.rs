use crate::stack::StackSummary;

const ACTIVE_STATUSES: [&str; 6] = [
    "CREATE_COMPLETE",
    "UPDATE_COMPLETE",
    "ROLLBACK_COMPLETE",
    "UPDATE_ROLLBACK_COMPLETE",
    "IMPORT_COMPLETE",
    "IMPORT_ROLLBACK_COMPLETE",
];

pub fn is_active(status: &str) -> bool {
    ACTIVE_STATUSES.contains(&status)
}

pub fn is_complete(status: &str) -> bool {
    status.ends_with("_COMPLETE")
}

pub fn is_deleted(status: &str) -> bool {
    status.starts_with("DELETE_")
}

pub fn is_in_progress(status: &str) -> bool {
    status.ends_with("_IN_PROGRESS")
}

/// Status categories requested on the command line. Categories overlap:
/// `DELETE_COMPLETE` is both complete and deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusFilter {
    pub all: bool,
    pub active: bool,
    pub complete: bool,
    pub deleted: bool,
    pub in_progress: bool,
}

impl StatusFilter {
    fn is_unset(&self) -> bool {
        !(self.active || self.complete || self.deleted || self.in_progress)
    }

    pub fn admits(&self, status: &str) -> bool {
        if self.all {
            return true;
        }
        if self.is_unset() {
            return status != "DELETE_COMPLETE";
        }

        (self.active && is_active(status))
            || (self.complete && is_complete(status))
            || (self.deleted && is_deleted(status))
            || (self.in_progress && is_in_progress(status))
    }
}

/// Status categories plus case-insensitive name and description filters, all
/// ANDed together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackFilter {
    pub status: StatusFilter,
    pub name_contains: Option<String>,
    pub desc_contains: Option<String>,
    pub desc_excludes: Option<String>,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl StackFilter {
    pub fn matches(&self, stack: &StackSummary) -> bool {
        if !self.status.admits(&stack.status) {
            return false;
        }
        if let Some(name) = self.name_contains.as_deref() {
            if !contains_ignore_case(&stack.name, name) {
                return false;
            }
        }

        let description = stack.description.as_deref();
        if let Some(wanted) = self.desc_contains.as_deref() {
            if !description.is_some_and(|d| contains_ignore_case(d, wanted)) {
                return false;
            }
        }
        if let Some(unwanted) = self.desc_excludes.as_deref() {
            if description.is_some_and(|d| contains_ignore_case(d, unwanted)) {
                return false;
            }
        }
        true
    }
}
