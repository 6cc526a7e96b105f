use anyhow::Context;

use crate::{aws_client::AwsClient, display::Display};

pub struct EventsCommand {
    client: AwsClient,
    stack: String,
    limit: usize,
    display: Display,
}

impl EventsCommand {
    pub fn new(client: AwsClient, stack: String, limit: usize) -> Self {
        Self {
            client,
            stack,
            limit,
            display: Display::new(),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let events = self
            .client
            .describe_stack_events(&self.stack, self.limit)
            .await
            .with_context(|| format!("Describe stack events {}", self.stack))?;
        self.display.print_stack_events(&events)?;
        Ok(())
    }
}
