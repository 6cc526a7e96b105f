use anyhow::Context;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cloudformation::{
    primitives::DateTime as AwsDateTime,
    types::{self, Stack, StackEvent, StackResourceSummary},
    Client,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{
    config::AwsSettings,
    error::CfnError,
    stack::{StackLister, StackSummary, TemplateFetcher, TemplateStage},
};

pub struct AwsClient {
    inner: Client,
}

pub fn to_chrono(time: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(time.secs(), time.subsec_nanos())
}

impl AwsClient {
    pub async fn new(settings: &AwsSettings) -> Result<Self, CfnError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(profile) = &settings.profile {
            loader = loader.profile_name(profile);
        }
        let config = loader.load().await;

        if config.region().is_none() {
            return Err(CfnError::Configuration(
                "no AWS region configured, pass --region or set AWS_REGION".to_string(),
            ));
        }
        debug!("Using region {:?}", config.region());

        Ok(Self {
            inner: Client::new(&config),
        })
    }

    pub async fn describe_stack(&self, stack_name: &str) -> anyhow::Result<Stack> {
        let describe_stacks_output = self
            .inner
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await?;
        let stacks = describe_stacks_output.stacks.context("No stacks list")?;
        let stack = stacks.into_iter().next().context("Empty stacks list")?;
        debug!("Stack description: {stack:?}");
        Ok(stack)
    }

    pub async fn list_stack_resources(
        &self,
        stack_name: &str,
    ) -> anyhow::Result<Vec<StackResourceSummary>> {
        info!("List stack resources {stack_name}");
        let resources: Vec<_> = self
            .inner
            .list_stack_resources()
            .stack_name(stack_name)
            .into_paginator()
            .items()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await?;

        debug!("List stack resources result: {resources:?}");
        Ok(resources)
    }

    /// Newest events first, at most `limit` of them.
    pub async fn describe_stack_events(
        &self,
        stack_name: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<StackEvent>> {
        info!("Describe stack events {stack_name}");
        let mut pages = self
            .inner
            .describe_stack_events()
            .stack_name(stack_name)
            .into_paginator()
            .items()
            .send();

        let mut stack_events = Vec::new();
        while stack_events.len() < limit {
            match pages.next().await {
                Some(event) => stack_events.push(event?),
                None => break,
            }
        }

        debug!("Describe stack events result: {stack_events:?}");
        Ok(stack_events)
    }

    pub async fn get_template(
        &self,
        stack_name: &str,
        stage: TemplateStage,
    ) -> anyhow::Result<String> {
        let stage = match stage {
            TemplateStage::Original => types::TemplateStage::Original,
            TemplateStage::Processed => types::TemplateStage::Processed,
        };
        let output = self
            .inner
            .get_template()
            .stack_name(stack_name)
            .template_stage(stage)
            .send()
            .await
            .with_context(|| format!("Get template of {stack_name}"))?;

        Ok(output.template_body.unwrap_or_default())
    }
}

#[async_trait]
impl StackLister for AwsClient {
    async fn list_stacks(&self) -> anyhow::Result<Vec<StackSummary>> {
        info!("List stacks");
        let summaries: Vec<_> = self
            .inner
            .list_stacks()
            .into_paginator()
            .items()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await?;
        debug!("Listed {} stack summaries", summaries.len());

        Ok(summaries
            .into_iter()
            .filter_map(|summary| {
                Some(StackSummary {
                    name: summary.stack_name?,
                    status: summary
                        .stack_status
                        .map(|s| s.as_str().to_string())
                        .unwrap_or_default(),
                    creation_time: summary.creation_time.as_ref().and_then(to_chrono),
                    description: summary.template_description,
                })
            })
            .collect())
    }
}

#[async_trait]
impl TemplateFetcher for AwsClient {
    async fn fetch_template(
        &self,
        stack_name: &str,
        stage: TemplateStage,
    ) -> anyhow::Result<String> {
        self.get_template(stack_name, stage).await
    }
}
