use crate::{
    aws_client::AwsClient,
    commands::search::search_stacks,
    config::SearchConfig,
    display::Display,
    error::CfnError,
    stack::StackLister,
    status::StackFilter,
};

pub struct ListCommand {
    client: AwsClient,
    display: Display,
    filter: StackFilter,
    names_only: bool,
    search: Option<SearchConfig>,
}

impl ListCommand {
    pub fn new(
        client: AwsClient,
        filter: StackFilter,
        names_only: bool,
        search: Option<SearchConfig>,
    ) -> Self {
        Self {
            client,
            display: Display::new(),
            filter,
            names_only,
            search,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let stacks = self
            .client
            .list_matching(&self.filter)
            .await
            .map_err(CfnError::ListFailure)?;

        if let Some(config) = &self.search {
            let report = search_stacks(&self.client, &stacks, config).await?;
            self.display
                .print_search_report(&report, &config.criteria, config.names_only)?;
            return Ok(());
        }

        if self.names_only {
            self.display.print_stack_names(&stacks)?;
            return Ok(());
        }
        if stacks.is_empty() {
            return Err(CfnError::NoStacksFound.into());
        }
        self.display.print_stack_summaries(&stacks)?;
        Ok(())
    }
}
