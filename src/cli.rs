use clap::{ArgAction, Args, Parser, Subcommand};

use crate::{matcher::PropertyFilter, search::DEFAULT_CONCURRENCY};

#[derive(Parser, Debug)]
#[command(name = "cfn", version, about = "Inspect and search CloudFormation stacks", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// AWS region (uses the default provider chain if not specified)
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Named AWS profile
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Maximum number of templates fetched at the same time
    #[arg(long, global = true, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Stop a template search after this many seconds and report what was found
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List stacks; with --type, --resource-name or --property, search their templates
    List(ListArgs),

    /// Search for stacks containing a specific resource type
    Search(SearchArgs),

    /// Show a stack and its resources
    Describe { stack: String },

    /// Show the most recent events of a stack
    Events {
        stack: String,
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Show the outputs of a stack
    Outputs { stack: String },

    /// Print the template of a stack
    Template {
        stack: String,
        /// Print the template after transforms instead of the submitted one
        #[arg(long)]
        processed: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct StatusArgs {
    /// Show all stacks (overrides other status filters)
    #[arg(short = 'A', long)]
    pub all: bool,

    /// Filter active stacks (stable *_COMPLETE states, excluding deletes)
    #[arg(short, long)]
    pub active: bool,

    /// Filter complete stacks (*_COMPLETE statuses)
    #[arg(short, long)]
    pub complete: bool,

    /// Filter deleted stacks (DELETE_* statuses)
    #[arg(short, long)]
    pub deleted: bool,

    /// Filter in-progress stacks (*_IN_PROGRESS statuses)
    #[arg(short, long)]
    pub in_progress: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Resource type, e.g. AWS::S3::Bucket
    pub resource_type: String,

    /// Filter by property (format: key=value or nested.key=value)
    #[arg(short, long = "property", value_name = "KEY=VALUE")]
    pub properties: Vec<PropertyFilter>,

    #[command(flatten)]
    pub status: StatusArgs,

    /// Print only stack names, one per line
    #[arg(short = '1', long)]
    pub names_only: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Filter stacks whose name contains this string (same as --name)
    #[arg(conflicts_with = "name")]
    pub name_filter: Option<String>,

    /// Filter stacks whose name contains this string (case-insensitive)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Filter stacks whose description contains this string (case-insensitive)
    #[arg(long)]
    pub desc: Option<String>,

    /// Exclude stacks whose description contains this string (case-insensitive)
    #[arg(long)]
    pub no_desc: Option<String>,

    #[command(flatten)]
    pub status: StatusArgs,

    /// Print only stack names, one per line
    #[arg(short = '1', long)]
    pub names_only: bool,

    /// Search for resource type (e.g. AWS::S3::Bucket)
    #[arg(short = 't', long = "type")]
    pub resource_type: Option<String>,

    /// Search for resource logical ID (substring)
    #[arg(short = 'R', long)]
    pub resource_name: Option<String>,

    /// Search for resource property (format: key=value or nested.key=value)
    #[arg(short, long = "property", value_name = "KEY=VALUE")]
    pub properties: Vec<PropertyFilter>,
}
