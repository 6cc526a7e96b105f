use anyhow::bail;

use crate::{aws_client::AwsClient, display::Display, stack::TemplateStage};

pub struct TemplateCommand {
    client: AwsClient,
    stack: String,
    stage: TemplateStage,
    display: Display,
}

impl TemplateCommand {
    pub fn new(client: AwsClient, stack: String, stage: TemplateStage) -> Self {
        Self {
            client,
            stack,
            stage,
            display: Display::new(),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let body = self.client.get_template(&self.stack, self.stage).await?;
        if body.is_empty() {
            bail!("Stack {} has no {:?} template", self.stack, self.stage);
        }
        self.display.print_template(&body)?;
        Ok(())
    }
}
