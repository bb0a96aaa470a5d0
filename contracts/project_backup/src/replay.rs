use std::fmt::Debug;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use project_funding::ProjectFundingContractClient;
use soroban_sdk::{Address, String as SorobanString};

use crate::ProjectRecord;

/// Reads every project from the ledger, in id order.
pub fn export_projects(client: &ProjectFundingContractClient) -> Result<Vec<ProjectRecord>> {
    let count = settle(client.try_get_project_count()).context("reading project count")?;
    info!("exporting {count} projects from {:?}", client.address);

    let mut records = Vec::with_capacity(count as usize);
    for project_id in 1..=count {
        let project = settle(client.try_get_project(&project_id))
            .with_context(|| format!("reading project {project_id}"))?;
        let record = ProjectRecord::from_project(&project)
            .with_context(|| format!("converting project {project_id}"))?;
        debug!("found project {}: {}", record.id, record.name);
        records.push(record);
    }

    Ok(records)
}

/// Recreates `records` on a fresh ledger and returns the new ids in order.
///
/// Projects are created by `creator`. Paused and completed flags are replayed
/// as each record's beneficiary, who must authorize those calls. Donation and
/// withdrawal history is not reconstructed.
pub fn import_projects(
    client: &ProjectFundingContractClient,
    creator: &Address,
    records: &[ProjectRecord],
) -> Result<Vec<u64>> {
    let env = &client.env;
    let mut project_ids = Vec::with_capacity(records.len());

    for record in records {
        let beneficiary = record
            .beneficiary_address(env)
            .with_context(|| format!("importing project {:?}", record.name))?;

        let project_id = settle(client.try_create_project(
            creator,
            &SorobanString::from_str(env, &record.name),
            &SorobanString::from_str(env, &record.description),
            &SorobanString::from_str(env, &record.location),
            &record.funding_goal,
            &beneficiary,
        ))
        .with_context(|| format!("creating project {:?}", record.name))?;
        debug!("project {:?} created as {project_id}", record.name);

        if !record.is_funding_active && !record.is_completed {
            settle(client.try_toggle_funding_status(&beneficiary, &project_id, &false))
                .with_context(|| format!("pausing project {project_id}"))?;
            debug!("project {project_id} funding set to inactive");
        }

        if record.is_completed {
            settle(client.try_complete_project(&beneficiary, &project_id))
                .with_context(|| format!("completing project {project_id}"))?;
            debug!("project {project_id} marked as completed");
        }

        project_ids.push(project_id);
    }

    info!("imported {} projects", project_ids.len());
    Ok(project_ids)
}

/// Flattens the nested result of a `try_*` client call.
fn settle<T, C, E, I>(result: Result<Result<T, C>, Result<E, I>>) -> Result<T>
where
    C: Debug,
    E: Debug,
    I: Debug,
{
    match result {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(conversion)) => Err(anyhow!("unexpected return value: {conversion:?}")),
        Err(Ok(error)) => Err(anyhow!("ledger error: {error:?}")),
        Err(Err(invoke)) => Err(anyhow!("invocation failed: {invoke:?}")),
    }
}
