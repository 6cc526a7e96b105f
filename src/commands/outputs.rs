use anyhow::Context;

use crate::{aws_client::AwsClient, display::Display};

pub struct OutputsCommand {
    client: AwsClient,
    stack: String,
    display: Display,
}

impl OutputsCommand {
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
        self.display.print_stack_outputs(stack.outputs())?;
        Ok(())
    }
}
