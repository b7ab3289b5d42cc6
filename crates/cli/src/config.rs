//! Per-action configuration, assembled once from the process environment.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context};
use domain::{OwnerName, ProjectId};
use github::{GitHubConfig, RepositoryContext, DEFAULT_API_URL};
use jira::JiraConfig;
use rcedit::{ResourceProperties, DEFAULT_EDITOR};
use release::{JiraSettings, WalkMode, DEFAULT_MAX_CONCURRENCY};
use toolkit::{
    get_boolean_input, get_input, get_required_input, process_vars, ActionInputs, InputError,
};

/// Snapshot of action inputs and the plain environment variables the actions
/// consult (`GITHUB_*`, `RCEDIT_PATH`).
#[derive(Debug, Clone, Default)]
pub struct Environment {
    inputs: ActionInputs,
    vars: HashMap<String, String>,
}

impl Environment {
    pub fn capture() -> Self {
        let vars: HashMap<String, String> = process_vars().collect();
        Self {
            inputs: ActionInputs::from_vars(vars.clone()),
            vars,
        }
    }

    #[cfg(test)]
    pub fn from_pairs(inputs: &[(&str, &str)], vars: &[(&str, &str)]) -> Self {
        Self {
            inputs: ActionInputs::from_pairs(inputs.iter().copied()),
            vars: vars
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn inputs(&self) -> &ActionInputs {
        &self.inputs
    }

    /// Non-empty value of environment variable `name`.
    fn var(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Input `name`, or `default` when it is blank.
    fn input_or(&self, name: &str, default: &str) -> String {
        let value = get_input(&self.inputs, name);
        if value.is_empty() {
            default.to_string()
        } else {
            value
        }
    }
}

// ---------------------------------------------------------------------------
// Jira
// ---------------------------------------------------------------------------

/// Jira connection and release-bookkeeping settings shared by both release
/// actions.
#[derive(Debug, Clone)]
pub struct JiraSection {
    pub connection: JiraConfig,
    pub project: ProjectId,
    pub walk_mode: WalkMode,
    pub max_concurrency: usize,
}

impl JiraSection {
    fn from_env(env: &Environment) -> anyhow::Result<Self> {
        let inputs = env.inputs();
        let connection = JiraConfig {
            host: get_required_input(inputs, "jira-host")?,
            username: get_required_input(inputs, "jira-username")?,
            api_token: get_required_input(inputs, "jira-token")?,
        };
        let project = ProjectId::new(get_required_input(inputs, "jira-project-id")?)
            .context("jira-project-id is blank")?;

        Ok(Self {
            connection,
            project,
            walk_mode: parse_walk_mode(&get_input(inputs, "walk-mode"))?,
            max_concurrency: parse_max_concurrency(&get_input(inputs, "max-concurrency"))?,
        })
    }

    pub fn settings(&self) -> JiraSettings {
        JiraSettings {
            project: self.project.clone(),
            walk_mode: self.walk_mode,
            max_concurrency: self.max_concurrency,
        }
    }
}

fn parse_walk_mode(raw: &str) -> Result<WalkMode, InputError> {
    match raw {
        "" | "single-hop" => Ok(WalkMode::SingleHop),
        "until-released" => Ok(WalkMode::UntilReleased),
        other => Err(InputError::Invalid {
            name: "walk-mode".to_string(),
            message: format!("expected single-hop or until-released, got {other:?}"),
        }),
    }
}

fn parse_max_concurrency(raw: &str) -> Result<usize, InputError> {
    if raw.is_empty() {
        return Ok(DEFAULT_MAX_CONCURRENCY);
    }
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(InputError::Invalid {
            name: "max-concurrency".to_string(),
            message: format!("expected a positive integer, got {raw:?}"),
        }),
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Settings of the `release` action.
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    /// Lockfile path, relative to the repository root.
    pub lockfile: String,
    pub repositories: PathBuf,
    pub dry_run: bool,
    pub owner: OwnerName,
    pub repository: RepositoryContext,
    pub github: GitHubConfig,
    pub jira: JiraSection,
}

impl ReleaseConfig {
    pub fn from_env(env: &Environment) -> anyhow::Result<Self> {
        let inputs = env.inputs();
        let full_name = env
            .var("GITHUB_REPOSITORY")
            .context("GITHUB_REPOSITORY is not set")?;
        let repository = RepositoryContext::parse(full_name)
            .with_context(|| format!("GITHUB_REPOSITORY is not owner/repo: {full_name}"))?;

        let owner = match get_input(inputs, "owner") {
            o if !o.is_empty() => OwnerName::new(o).context("owner is blank")?,
            _ => repository.owner.clone(),
        };

        let token = match get_input(inputs, "github-token") {
            t if !t.is_empty() => t,
            _ => match env.var("GITHUB_TOKEN") {
                Some(t) => t.to_string(),
                None => bail!("Input required and not supplied: github-token"),
            },
        };
        let github = GitHubConfig {
            api_url: env.var("GITHUB_API_URL").unwrap_or(DEFAULT_API_URL).to_string(),
            token,
        };

        Ok(Self {
            lockfile: env.input_or("lockfile", "lockfile.json"),
            repositories: env.input_or("repositories", "repositories.json").into(),
            dry_run: get_boolean_input(inputs, "dry-run", false)?,
            owner,
            repository,
            github,
            jira: JiraSection::from_env(env)?,
        })
    }
}

/// Settings of the `jira-release` action.
#[derive(Debug, Clone)]
pub struct JiraReleaseConfig {
    pub lockfile: PathBuf,
    pub issues_file: PathBuf,
    pub dry_run: bool,
    pub jira: JiraSection,
}

impl JiraReleaseConfig {
    pub fn from_env(env: &Environment) -> anyhow::Result<Self> {
        let inputs = env.inputs();
        Ok(Self {
            lockfile: env.input_or("lockfile", "lockfile.json").into(),
            issues_file: get_required_input(inputs, "issues-file")?.into(),
            dry_run: get_boolean_input(inputs, "dry-run", false)?,
            jira: JiraSection::from_env(env)?,
        })
    }
}

/// Settings of the `rcedit` action.
#[derive(Debug, Clone)]
pub struct RceditConfig {
    /// Glob of binaries to edit.
    pub path: String,
    pub properties: ResourceProperties,
    pub editor: PathBuf,
}

impl RceditConfig {
    pub fn from_env(env: &Environment) -> anyhow::Result<Self> {
        let inputs = env.inputs();
        let path = get_required_input(inputs, "path")?;
        let properties = ResourceProperties::from_inputs(inputs)?;
        Ok(Self {
            path,
            properties,
            editor: env.var("RCEDIT_PATH").unwrap_or(DEFAULT_EDITOR).into(),
        })
    }
}

/// Settings of the `unzip` action.
#[derive(Debug, Clone)]
pub struct UnzipConfig {
    pub path: PathBuf,
}

impl UnzipConfig {
    pub fn from_env(env: &Environment) -> Self {
        Self {
            path: env.input_or("path", ".").into(),
        }
    }
}
