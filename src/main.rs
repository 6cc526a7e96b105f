use clap::Parser;
use tracing::{info_span, Instrument};

use cfn_inspect::{
    aws_client::AwsClient,
    cli::{Cli, Commands},
    commands::{
        describe::DescribeCommand, events::EventsCommand, list::ListCommand,
        outputs::OutputsCommand, search::SearchCommand, template::TemplateCommand,
    },
    config::{log_level, AwsSettings, SearchConfig},
    stack::TemplateStage,
    status::StackFilter,
};

#[::tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level(cli.global.verbose))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;

    let client = AwsClient::new(&AwsSettings::from(&cli.global)).await?;

    match cli.command {
        Commands::List(args) => {
            let search = SearchConfig::from_list_args(&args, &cli.global);
            ListCommand::new(client, StackFilter::from(&args), args.names_only, search)
                .run()
                .instrument(info_span!("list"))
                .await?;
        }
        Commands::Search(args) => {
            let span = info_span!("search", resource_type = %args.resource_type);
            let config = SearchConfig::from_search_args(&args, &cli.global);
            SearchCommand::new(client, StackFilter::from(&args), config)
                .run()
                .instrument(span)
                .await?;
        }
        Commands::Describe { stack } => {
            let span = info_span!("describe", stack = %stack);
            DescribeCommand::new(client, stack).run().instrument(span).await?;
        }
        Commands::Events { stack, limit } => {
            let span = info_span!("events", stack = %stack);
            EventsCommand::new(client, stack, limit)
                .run()
                .instrument(span)
                .await?;
        }
        Commands::Outputs { stack } => {
            let span = info_span!("outputs", stack = %stack);
            OutputsCommand::new(client, stack).run().instrument(span).await?;
        }
        Commands::Template { stack, processed } => {
            let span = info_span!("template", stack = %stack);
            let stage = if processed {
                TemplateStage::Processed
            } else {
                TemplateStage::Original
            };
            TemplateCommand::new(client, stack, stage)
                .run()
                .instrument(span)
                .await?;
        }
    }

    Ok(())
}
