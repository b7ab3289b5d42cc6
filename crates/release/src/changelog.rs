//! Computes the changelog of a release across its repositories.

use domain::{
    ChangelogEntry, GitError, HostError, LocalRepository, Lockfile, OwnerName,
    RepositoriesManifest, RepositoryHost, RepositoryName,
};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ChangelogError {
    #[error("could not determine the previous release: {0}")]
    PreviousRelease(#[source] GitError),

    #[error("could not read the changelog of {repository}: {source}")]
    Host {
        repository: RepositoryName,
        #[source]
        source: HostError,
    },
}

/// Everything the changelog computation reads from.
pub struct ChangelogSources<'a> {
    pub local: &'a dyn LocalRepository,
    pub host: &'a dyn RepositoryHost,
    pub owner: &'a OwnerName,
    /// Path of the lockfile inside the checkout, used to read the previous
    /// release's lockfile at its tag.
    pub lockfile_path: &'a str,
}

/// Collects the commits of every manifest repository between the previous
/// release and `lockfile`.
///
/// Repositories missing from the current lockfile are ignored; repositories
/// missing from the previous lockfile have no baseline and are skipped.
pub async fn collect_changelog(
    sources: &ChangelogSources<'_>,
    lockfile: &Lockfile,
    manifest: &RepositoriesManifest,
) -> Result<Vec<ChangelogEntry>, ChangelogError> {
    let previous_tag = sources
        .local
        .latest_version()
        .await
        .map_err(ChangelogError::PreviousRelease)?;
    info!(tag = %previous_tag, "previous release");

    let previous = match sources
        .local
        .read_file_at(&previous_tag, sources.lockfile_path)
        .await
        .map_err(|e| e.to_string())
        .and_then(|text| Lockfile::from_json(&text).map_err(|e| e.to_string()))
    {
        Ok(previous) => Some(previous),
        Err(reason) => {
            warn!(tag = %previous_tag, "no usable lockfile in the previous release: {reason}");
            None
        }
    };

    let mut entries = Vec::new();
    for repository in manifest.iter() {
        let Some(head) = lockfile.repositories.get(repository) else {
            debug!(%repository, "not part of this release");
            continue;
        };
        let Some(base) = previous
            .as_ref()
            .and_then(|p| p.repositories.get(repository))
        else {
            warn!(%repository, "no previous release of repository, skipping changelog");
            continue;
        };
        if base == head {
            debug!(%repository, "unchanged since previous release");
            continue;
        }

        let messages = sources
            .host
            .compare_commits(sources.owner, repository, base, head)
            .await
            .map_err(|source| ChangelogError::Host {
                repository: repository.clone(),
                source,
            })?;
        info!(%repository, commits = messages.len(), "collected changelog");
        entries.extend(
            messages
                .into_iter()
                .map(|m| ChangelogEntry::from_commit(repository.clone(), m)),
        );
    }
    Ok(entries)
}
