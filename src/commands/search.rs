use tracing::{info, warn};

use crate::{
    aws_client::AwsClient,
    commands::interrupt_token,
    config::SearchConfig,
    display::{Display, Progress},
    error::CfnError,
    matcher::SearchCriteria,
    search::{SearchReport, Searcher},
    stack::{StackLister, StackSummary, TemplateFetcher},
    status::StackFilter,
};

pub struct SearchCommand {
    client: AwsClient,
    display: Display,
    filter: StackFilter,
    config: SearchConfig,
}

impl SearchCommand {
    pub fn new(client: AwsClient, filter: StackFilter, config: SearchConfig) -> Self {
        Self {
            client,
            display: Display::new(),
            filter,
            config,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let stacks = self
            .client
            .list_matching(&self.filter)
            .await
            .map_err(CfnError::ListFailure)?;
        let report = search_stacks(&self.client, &stacks, &self.config).await?;
        self.display
            .print_search_report(&report, &self.config.criteria, self.config.names_only)?;
        Ok(())
    }
}

pub fn searching_message(stack_count: usize, criteria: &SearchCriteria) -> String {
    let mut message = format!("Searching {stack_count} stacks");
    if let Some(resource_type) = &criteria.resource_type {
        message.push_str(&format!(" for resource type {resource_type:?}"));
    }
    if let Some(resource_name) = &criteria.resource_name {
        message.push_str(&format!(" for resource name {resource_name:?}"));
    }
    message.push_str("...");
    message
}

/// Runs the template search over `stacks`; shared by `search` and `list`.
pub async fn search_stacks<F: TemplateFetcher + ?Sized>(
    fetcher: &F,
    stacks: &[StackSummary],
    config: &SearchConfig,
) -> anyhow::Result<SearchReport> {
    if stacks.is_empty() {
        return Err(CfnError::NoStacksToSearch.into());
    }

    let cancel = interrupt_token(config.timeout);
    let _stop_watchers = cancel.clone().drop_guard();
    let progress = (!config.names_only)
        .then(|| Progress::start(searching_message(stacks.len(), &config.criteria)));

    let report = Searcher::new(fetcher)
        .with_concurrency(config.concurrency)
        .with_cancellation(cancel)
        .search(stacks, &config.criteria)
        .await;

    if let Some(progress) = progress {
        progress.finish();
    }
    if report.interrupted {
        warn!(
            "Search stopped early: {} of {} stacks searched",
            report.searched, report.candidates
        );
    }
    info!(
        "{} of {} stacks have matching resources",
        report.stacks.len(),
        report.searched
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn searching_message_names_filters() {
        let criteria = SearchCriteria::new(
            Some("AWS::S3::Bucket".to_string()),
            Some("Logs".to_string()),
            [],
        );
        assert_eq!(
            searching_message(4, &criteria),
            "Searching 4 stacks for resource type \"AWS::S3::Bucket\" for resource name \"Logs\"..."
        );
        assert_eq!(
            searching_message(2, &SearchCriteria::default()),
            "Searching 2 stacks..."
        );
    }
}
