use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::status::StackFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSummary {
    pub name: String,
    pub status: String,
    pub creation_time: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

impl StackSummary {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
            creation_time: None,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateStage {
    /// The template as submitted by the user.
    #[default]
    Original,
    /// The template after transforms such as `AWS::Serverless` ran.
    Processed,
}

#[async_trait]
pub trait StackLister: Send + Sync {
    /// Every stack visible to the caller, across all pages.
    async fn list_stacks(&self) -> anyhow::Result<Vec<StackSummary>>;

    async fn list_matching(&self, filter: &StackFilter) -> anyhow::Result<Vec<StackSummary>> {
        let stacks = self.list_stacks().await?;
        Ok(stacks.into_iter().filter(|s| filter.matches(s)).collect())
    }
}

#[async_trait]
pub trait TemplateFetcher: Send + Sync {
    async fn fetch_template(&self, stack_name: &str, stage: TemplateStage)
        -> anyhow::Result<String>;
}
