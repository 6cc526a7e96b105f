//! Fan-out of the resource matcher over many stacks.
//!
//! Each stack is fetched, parsed and matched on its own; a stack that cannot
//! be read is skipped and logged at debug level, never reported as a failure
//! of the whole search.

use futures::{stream, StreamExt};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, debug_span, Instrument};

use crate::{
    matcher::{match_resources, ResourceMatch, SearchCriteria},
    stack::{StackSummary, TemplateFetcher, TemplateStage},
    template::{self, TemplateError},
};

pub const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct StackMatch {
    pub stack_name: String,
    pub resources: Vec<ResourceMatch>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchReport {
    /// Stacks handed to the search.
    pub candidates: usize,
    /// Stacks whose template was processed before the search ended.
    pub searched: usize,
    /// Set when cancellation cut the search short.
    pub interrupted: bool,
    /// Stacks with at least one matching resource, in input order.
    pub stacks: Vec<StackMatch>,
}

impl SearchReport {
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}

/// Why a stack contributed nothing to the report.
#[derive(Error, Debug)]
pub enum Skipped {
    #[error("template could not be fetched: {0:#}")]
    Fetch(anyhow::Error),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("template declares no resources")]
    NoResources,

    #[error("no matching resources")]
    NoMatches,
}

pub struct Searcher<'a, F: ?Sized> {
    fetcher: &'a F,
    concurrency: usize,
    cancel: CancellationToken,
}

impl<'a, F: TemplateFetcher + ?Sized> Searcher<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self {
            fetcher,
            concurrency: DEFAULT_CONCURRENCY,
            cancel: CancellationToken::new(),
        }
    }

    /// Maximum number of templates fetched at the same time.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Once `cancel` fires, in-flight fetches are dropped and the report
    /// holds whatever completed.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub async fn search(&self, stacks: &[StackSummary], criteria: &SearchCriteria) -> SearchReport {
        if stacks.is_empty() {
            return SearchReport::default();
        }

        let mut outcomes: Vec<(usize, Result<StackMatch, Skipped>)> =
            stream::iter(stacks.iter().enumerate())
                .map(|(index, stack)| {
                    let span = debug_span!("stack", name = %stack.name);
                    async move {
                        let outcome = self.search_stack(&stack.name, criteria).await;
                        if let Err(skipped) = &outcome {
                            debug!("skipped: {skipped}");
                        }
                        (index, outcome)
                    }
                    .instrument(span)
                })
                .buffer_unordered(self.concurrency)
                .take_until(self.cancel.cancelled())
                .collect()
                .await;
        outcomes.sort_by_key(|(index, _)| *index);

        let searched = outcomes.len();
        SearchReport {
            candidates: stacks.len(),
            searched,
            interrupted: searched < stacks.len(),
            stacks: outcomes
                .into_iter()
                .filter_map(|(_, outcome)| outcome.ok())
                .collect(),
        }
    }

    async fn search_stack(
        &self,
        stack_name: &str,
        criteria: &SearchCriteria,
    ) -> Result<StackMatch, Skipped> {
        let body = self
            .fetcher
            .fetch_template(stack_name, TemplateStage::Original)
            .await
            .map_err(Skipped::Fetch)?;
        let document = template::parse(&body)?;
        let resources = template::resources(&document).ok_or(Skipped::NoResources)?;

        let matches = match_resources(resources, criteria);
        if matches.is_empty() {
            return Err(Skipped::NoMatches);
        }
        Ok(StackMatch {
            stack_name: stack_name.to_string(),
            resources: matches,
        })
    }
}
