use std::io::{self, IsTerminal, Write};

use aws_sdk_cloudformation::types::{Output, Stack, StackEvent, StackResourceSummary};
use colored::{ColoredString, Colorize};
use spinners::{Spinner, Spinners, Stream};
use tracing::info;

use crate::{
    aws_client::to_chrono,
    matcher::SearchCriteria,
    search::SearchReport,
    stack::StackSummary,
    status::{is_complete, is_deleted, is_in_progress},
};

const UNKNOWN: &str = "-";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_len - 3).collect();
    format!("{kept}...")
}

fn colored_status(status: &str) -> ColoredString {
    if status.ends_with("_FAILED") || status.contains("ROLLBACK") {
        status.red()
    } else if is_in_progress(status) {
        status.yellow()
    } else if is_complete(status) && !is_deleted(status) {
        status.green()
    } else {
        status.normal()
    }
}

pub fn write_stack_table(out: &mut impl Write, stacks: &[StackSummary]) -> io::Result<()> {
    writeln!(out, "{:<50} {:<30} {:<20}", "STACK NAME", "STATUS", "CREATION TIME")?;
    writeln!(out, "{}", "-".repeat(100))?;
    for stack in stacks {
        let created = stack
            .creation_time
            .map(|t| t.format(TIME_FORMAT).to_string())
            .unwrap_or_default();
        writeln!(
            out,
            "{:<50} {:<30} {:<20}",
            truncate(&stack.name, 50),
            colored_status(&stack.status),
            created
        )?;
    }
    writeln!(out, "\nTotal: {} stacks", stacks.len())
}

pub fn write_stack_names<'a>(
    out: &mut impl Write,
    names: impl IntoIterator<Item = &'a str>,
) -> io::Result<()> {
    for name in names {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

/// The single line printed when a search matched nothing, naming the active
/// filters.
pub fn no_matches_message(criteria: &SearchCriteria) -> String {
    let mut message = String::from("No stacks found");
    if let Some(resource_type) = &criteria.resource_type {
        message.push_str(&format!(" containing resource type {resource_type:?}"));
    }
    if let Some(resource_name) = &criteria.resource_name {
        message.push_str(&format!(" containing resource name {resource_name:?}"));
    }
    if !criteria.properties().is_empty() {
        message.push_str(" with properties:");
        for filter in criteria.properties() {
            message.push_str(&format!(" {filter}"));
        }
    }
    message
}

pub fn write_search_report(
    out: &mut impl Write,
    report: &SearchReport,
    criteria: &SearchCriteria,
    names_only: bool,
) -> io::Result<()> {
    if names_only {
        return write_stack_names(out, report.stacks.iter().map(|s| s.stack_name.as_str()));
    }
    if report.is_empty() {
        return writeln!(out, "{}", no_matches_message(criteria));
    }

    writeln!(
        out,
        "Found {} stack(s) with matching resources:\n",
        report.stacks.len()
    )?;
    for stack in &report.stacks {
        writeln!(out, "Stack: {}", stack.stack_name.bold())?;
        for resource in &stack.resources {
            writeln!(
                out,
                "  - {} ({})",
                resource.logical_id,
                resource.resource_type.cyan()
            )?;
            for (key, value) in &resource.matched_properties {
                writeln!(out, "      {key}: {value}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Spinner on an interactive stderr while templates are fetched.
pub struct Progress(Option<Spinner>);

impl Progress {
    pub fn start(message: String) -> Self {
        if !io::stderr().is_terminal() {
            info!("{message}");
            return Self(None);
        }
        Self(Some(Spinner::with_stream(
            Spinners::Dots9,
            message,
            Stream::Stderr,
        )))
    }

    pub fn finish(self) {
        if let Some(mut spinner) = self.0 {
            spinner.stop();
            eprint!("\r\x1b[2K");
        }
    }
}

#[derive(Default)]
pub struct Display;

impl Display {
    pub fn new() -> Self {
        Self
    }

    pub fn print_stack_summaries(&self, stacks: &[StackSummary]) -> io::Result<()> {
        write_stack_table(&mut io::stdout().lock(), stacks)
    }

    pub fn print_stack_names(&self, stacks: &[StackSummary]) -> io::Result<()> {
        write_stack_names(&mut io::stdout().lock(), stacks.iter().map(|s| s.name.as_str()))
    }

    pub fn print_search_report(
        &self,
        report: &SearchReport,
        criteria: &SearchCriteria,
        names_only: bool,
    ) -> io::Result<()> {
        write_search_report(&mut io::stdout().lock(), report, criteria, names_only)
    }

    pub fn print_stack(&self, stack: &Stack) -> io::Result<()> {
        let mut lock = io::stdout().lock();
        let status = stack.stack_status().map(|s| s.as_str()).unwrap_or(UNKNOWN);
        writeln!(lock, "Stack: {}", stack.stack_name().unwrap_or(UNKNOWN).bold())?;
        writeln!(lock, "Id: {}", stack.stack_id().unwrap_or(UNKNOWN))?;
        writeln!(lock, "Status: {}", colored_status(status))?;
        if let Some(reason) = stack.stack_status_reason() {
            writeln!(lock, "Reason: {reason}")?;
        }
        if let Some(description) = stack.description() {
            writeln!(lock, "Description: {description}")?;
        }
        for (label, time) in [
            ("Created", stack.creation_time()),
            ("Updated", stack.last_updated_time()),
        ] {
            if let Some(time) = time.and_then(to_chrono) {
                writeln!(lock, "{label}: {}", time.format(TIME_FORMAT))?;
            }
        }
        Ok(())
    }

    pub fn print_stack_resources(&self, resources: &[StackResourceSummary]) -> io::Result<()> {
        let mut lock = io::stdout().lock();
        writeln!(lock, "\nResources:")?;
        writeln!(
            lock,
            "{:<40} {:<45} {:<30}",
            "LOGICAL ID", "TYPE", "STATUS"
        )?;
        for resource in resources {
            let status = resource
                .resource_status()
                .map(|s| s.as_str())
                .unwrap_or(UNKNOWN);
            writeln!(
                lock,
                "{:<40} {:<45} {:<30}",
                truncate(resource.logical_resource_id().unwrap_or(UNKNOWN), 40),
                truncate(resource.resource_type().unwrap_or(UNKNOWN), 45),
                colored_status(status)
            )?;
            if let Some(physical_id) = resource.physical_resource_id() {
                writeln!(lock, "    {}", physical_id.dimmed())?;
            }
        }
        Ok(())
    }

    pub fn print_stack_events(&self, events: &[StackEvent]) -> io::Result<()> {
        let mut lock = io::stdout().lock();
        for event in events {
            let time = event
                .timestamp()
                .and_then(to_chrono)
                .map(|t| t.format(TIME_FORMAT).to_string())
                .unwrap_or_default();
            let status = event
                .resource_status()
                .map(|s| s.as_str())
                .unwrap_or(UNKNOWN);
            writeln!(
                lock,
                "{:<20} {:<35} {:<40} {}",
                time,
                colored_status(status),
                truncate(event.logical_resource_id().unwrap_or(UNKNOWN), 40),
                event.resource_type().unwrap_or(UNKNOWN)
            )?;
            if let Some(reason) = event.resource_status_reason() {
                writeln!(lock, "    reason: {}", reason.red())?;
            }
        }
        Ok(())
    }

    pub fn print_stack_outputs(&self, outputs: &[Output]) -> io::Result<()> {
        let mut lock = io::stdout().lock();
        if outputs.is_empty() {
            return writeln!(lock, "No outputs");
        }
        for output in outputs {
            writeln!(
                lock,
                "{}: {}",
                output.output_key().unwrap_or(UNKNOWN).bold(),
                output.output_value().unwrap_or(UNKNOWN)
            )?;
            if let Some(description) = output.description() {
                writeln!(lock, "    {}", description.dimmed())?;
            }
            if let Some(export) = output.export_name() {
                writeln!(lock, "    export: {export}")?;
            }
        }
        Ok(())
    }

    pub fn print_template(&self, body: &str) -> io::Result<()> {
        let mut lock = io::stdout().lock();
        write!(lock, "{body}")?;
        if !body.ends_with('\n') {
            writeln!(lock)?;
        }
        Ok(())
    }
}
