//! Backport command - the single interactive run

use crate::cli::CliInteraction;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, arrow, check, hyperlink, spinner_style};
use anstream::println;
use backporter::cherry_pick::CherryPicker;
use backporter::error::{Error, Result};
use backporter::platform::MergeRequestGateway;
use backporter::policy;
use backporter::tracker::TicketCache;
use backporter::types::{CherryPickRequest, Completion};
use dialoguer::Input;
use indicatif::ProgressBar;
use std::path::Path;
use std::time::Duration;

/// Where the commits to pick come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitSource {
    /// Resolve commits from merge request ids (default)
    MergeRequests,
    /// Commit hashes typed by the operator
    Hashes,
}

fn prompt(label: &str, placeholder: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(format!("{label} {}", format!("(e.g. {placeholder})").muted()))
        .interact_text()
        .map(|s| s.trim().to_string())
        .map_err(|e| Error::Input(format!("failed to read {label}: {e}")))
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Split whitespace-separated commit hashes
fn parse_hashes(input: &str) -> Vec<String> {
    input.split_whitespace().map(String::from).collect()
}

/// Parse whitespace-separated merge request ids (`27469 !27851`)
fn parse_merge_request_ids(input: &str) -> Result<Vec<u64>> {
    let ids = input
        .split_whitespace()
        .map(|token| {
            token
                .trim_start_matches('!')
                .parse::<u64>()
                .map_err(|_| Error::Input(format!("'{token}' is not a merge request id")))
        })
        .collect::<Result<Vec<_>>>()?;

    if ids.is_empty() {
        return Err(Error::Input("no merge request ids given".to_string()));
    }
    Ok(ids)
}

/// Run the backport: look up the ticket, gather commits, cherry-pick and
/// open the merge request
#[allow(clippy::future_not_send)]
pub async fn run_backport(config_path: Option<&Path>, source: CommitSource) -> Result<()> {
    println!("{}", "backport".emphasis());
    println!(
        "{}",
        "Cherry-pick a ticket onto its release/hotfix branch".muted()
    );
    println!();

    let ctx = CommandContext::new(config_path)?;
    println!(
        "{}",
        format!("Repository: {}", ctx.config.repository_root().display()).muted()
    );

    let ticket_key = prompt("Ticket", "SOCS-1234")?;

    // Ticket lookups
    let sp = spinner(format!("Fetching {} from Jira...", ticket_key.emphasis()));
    let mut tickets = TicketCache::new(&ctx.jira);
    let lookup = async {
        let kind = tickets.work_item_kind(&ticket_key).await?;
        let version = tickets.fix_version(&ticket_key).await?;
        let ticket = tickets.get(&ticket_key).await?.clone();
        Ok::<_, Error>((kind, version, ticket))
    }
    .await;
    let (kind, version, ticket) = match lookup {
        Ok(found) => found,
        Err(e) => {
            sp.finish_and_clear();
            return Err(e);
        }
    };
    sp.finish_with_message(format!(
        "{} {} ({kind}) {} {}",
        check(),
        ticket.key.emphasis(),
        arrow(),
        policy::target_branch_for(&version).accent()
    ));

    // Commits
    let hashes = match source {
        CommitSource::Hashes => parse_hashes(&prompt(
            "Commits to pick, space separated",
            "bf222cf d3a3e8e",
        )?),
        CommitSource::MergeRequests => {
            let ids = parse_merge_request_ids(&prompt(
                "Merge request ids, space separated",
                "27469 27851",
            )?)?;
            let sp = spinner(format!("Resolving {} merge request(s)...", ids.len()));
            match ctx.gitlab.resolve_commits(&ids).await {
                Ok(hashes) => {
                    sp.finish_with_message(format!(
                        "{} {} commit(s) from {} merge request(s)",
                        check(),
                        hashes.len().accent(),
                        ids.len()
                    ));
                    hashes
                }
                Err(e) => {
                    sp.finish_and_clear();
                    return Err(e);
                }
            }
        }
    };

    let request = CherryPickRequest::for_ticket(&ticket, hashes)?;

    println!();
    println!(
        "{} {} {} {}",
        "Starting cherry-pick:".emphasis(),
        request.working_branch().accent(),
        arrow(),
        request.target_branch().accent()
    );

    let interaction = CliInteraction;
    let mut picker = CherryPicker::new(&ctx.runner, &ctx.gitlab, &interaction, &ctx.settings);
    let completion = picker.execute(&request).await?;

    println!();
    match completion {
        Completion::Success { merge_request } => {
            println!(
                "{} {}",
                check(),
                "Cherry-pick completed successfully!".success()
            );
            println!(
                "   {}",
                hyperlink(&format!("!{} {}", merge_request.iid, merge_request.title), &merge_request.web_url)
            );
        }
        Completion::Degraded { .. } => {
            println!(
                "{} {}",
                check(),
                "Cherry-pick completed, branch pushed.".success()
            );
            println!(
                "   {}",
                format!(
                    "Open the merge request by hand: {} -> {}",
                    request.working_branch(),
                    request.target_branch()
                )
                .muted()
            );
        }
    }

    Ok(())
}
