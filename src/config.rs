//! Immutable settings built once from the parsed command line.

use std::time::Duration;

use tracing::Level;

use crate::{
    cli::{GlobalArgs, ListArgs, SearchArgs, StatusArgs},
    matcher::SearchCriteria,
    status::{StackFilter, StatusFilter},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsSettings {
    pub region: Option<String>,
    pub profile: Option<String>,
}

impl From<&GlobalArgs> for AwsSettings {
    fn from(args: &GlobalArgs) -> Self {
        Self {
            region: args.region.clone(),
            profile: args.profile.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub criteria: SearchCriteria,
    pub concurrency: usize,
    pub timeout: Option<Duration>,
    pub names_only: bool,
}

impl SearchConfig {
    pub fn from_search_args(args: &SearchArgs, global: &GlobalArgs) -> Self {
        Self {
            criteria: SearchCriteria::new(
                Some(args.resource_type.clone()),
                None,
                args.properties.iter().cloned(),
            ),
            concurrency: global.concurrency.max(1),
            timeout: global.timeout.map(Duration::from_secs),
            names_only: args.names_only,
        }
    }

    /// `None` unless a resource filter turns the listing into a search.
    pub fn from_list_args(args: &ListArgs, global: &GlobalArgs) -> Option<Self> {
        let criteria = SearchCriteria::new(
            args.resource_type.clone(),
            args.resource_name.clone(),
            args.properties.iter().cloned(),
        );
        if criteria.is_empty() {
            return None;
        }

        Some(Self {
            criteria,
            concurrency: global.concurrency.max(1),
            timeout: global.timeout.map(Duration::from_secs),
            names_only: args.names_only,
        })
    }
}

impl From<&StatusArgs> for StatusFilter {
    fn from(args: &StatusArgs) -> Self {
        Self {
            all: args.all,
            active: args.active,
            complete: args.complete,
            deleted: args.deleted,
            in_progress: args.in_progress,
        }
    }
}

impl From<&ListArgs> for StackFilter {
    fn from(args: &ListArgs) -> Self {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
        Self {
            status: StatusFilter::from(&args.status),
            name_contains: non_empty(&args.name).or_else(|| non_empty(&args.name_filter)),
            desc_contains: non_empty(&args.desc),
            desc_excludes: non_empty(&args.no_desc),
        }
    }
}

impl From<&SearchArgs> for StackFilter {
    fn from(args: &SearchArgs) -> Self {
        Self {
            status: StatusFilter::from(&args.status),
            ..Default::default()
        }
    }
}

pub fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}
