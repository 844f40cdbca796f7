use std::path::{Component, Path, PathBuf};

use anyhow::{Result, bail};

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
pub const STORE_FILE_NAME: &str = "reports.sqlite";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    pub home_dir: PathBuf,
    pub cwd: PathBuf,
    pub out_dir: PathBuf,
    pub database: Option<PathBuf>,
    pub store: PathBuf,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PathOverrides<'a> {
    pub out_dir: Option<&'a Path>,
    pub database: Option<&'a Path>,
    pub store: Option<&'a Path>,
}

pub fn resolve_runtime_paths(
    home_dir: &Path,
    cwd: &Path,
    overrides: PathOverrides<'_>,
) -> Result<RuntimePaths> {
    if !home_dir.is_absolute() {
        bail!("home_dir must be absolute: {}", home_dir.display());
    }
    if !cwd.is_absolute() {
        bail!("cwd must be absolute: {}", cwd.display());
    }

    let home_dir = normalize_lexical(home_dir);
    let cwd = normalize_lexical(cwd);
    let out_dir = match overrides.out_dir {
        Some(path) => resolve_user_path(path, &home_dir, &cwd)?,
        None => normalize_lexical(&home_dir.join(".schemalens").join("output")),
    };
    let database = overrides
        .database
        .map(|path| resolve_user_path(path, &home_dir, &cwd))
        .transpose()?;
    let store = match overrides.store {
        Some(path) => resolve_user_path(path, &home_dir, &cwd)?,
        None => out_dir.join(STORE_FILE_NAME),
    };

    Ok(RuntimePaths {
        home_dir,
        cwd,
        out_dir,
        database,
        store,
    })
}

/// Settings for the HTTP completion client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default)]
pub struct GeneratorOverrides {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl GeneratorSettings {
    /// Flags win over environment variables, which win over defaults.
    pub fn resolve(
        overrides: GeneratorOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let non_empty = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let base_url = overrides
            .base_url
            .or_else(|| non_empty("SCHEMALENS_LLM_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            bail!("llm base url must start with http:// or https://: {base_url}");
        }

        let model = overrides
            .model
            .or_else(|| non_empty("SCHEMALENS_LLM_MODEL"))
            .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string());
        let timeout_secs = overrides.timeout_secs.unwrap_or(DEFAULT_LLM_TIMEOUT_SECS);
        if timeout_secs == 0 {
            bail!("llm timeout must be at least one second");
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key: non_empty("SCHEMALENS_LLM_API_KEY").or_else(|| non_empty("OPENAI_API_KEY")),
            timeout_secs,
        })
    }

    pub fn from_process_env(overrides: GeneratorOverrides) -> Result<Self> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }
}

fn resolve_user_path(path: &Path, home_dir: &Path, cwd: &Path) -> Result<PathBuf> {
    let expanded = expand_tilde(path, home_dir)?;
    let resolved = if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    };

    Ok(normalize_lexical(&resolved))
}

fn expand_tilde(path: &Path, home_dir: &Path) -> Result<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let mut expanded = home_dir.to_path_buf();
            for component in components {
                expanded.push(component.as_os_str());
            }
            Ok(expanded)
        }
        Some(Component::Normal(first))
            if first
                .to_str()
                .is_some_and(|segment| segment.starts_with('~')) =>
        {
            bail!(
                "unsupported home expansion syntax (only `~` and `~/...` are supported): {}",
                path.display()
            )
        }
        _ => Ok(path.to_path_buf()),
    }
}

fn normalize_lexical(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component.as_os_str());
                }
            }
            _ => normalized.push(component.as_os_str()),
        }
    }

    normalized
}
