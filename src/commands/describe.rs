use anyhow::Context;

use crate::{aws_client::AwsClient, display::Display};

pub struct DescribeCommand {
    client: AwsClient,
    stack: String,
    display: Display,
}

impl DescribeCommand {
    pub fn new(client: AwsClient, stack: String) -> Self {
        Self {
            client,
            stack,
            display: Display::new(),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let stack = self
            .client
            .describe_stack(&self.stack)
            .await
            .with_context(|| format!("Describe stack {}", self.stack))?;
        self.display.print_stack(&stack)?;

        let stack_id = stack.stack_id().unwrap_or(&self.stack);
        let stack_resources = self.client.list_stack_resources(stack_id).await?;
        self.display.print_stack_resources(&stack_resources)?;
        Ok(())
    }
}
