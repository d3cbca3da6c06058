// Provider chains: ordered, named acquisition strategies for one fact.

pub mod parse;

use tracing::instrument;

use crate::error::ProbeError;
use crate::host::Host;
use crate::models::{Field, Outcome};
use crate::policy::{FastModePolicy, FieldKey};

/// Where an adapter reads its raw text from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Env(&'static str),
    File(String),
    /// Yields the path itself when it exists.
    Exists(String),
    Command {
        program: &'static str,
        args: Vec<String>,
    },
}

impl Probe {
    pub fn env(key: &'static str) -> Self {
        Probe::Env(key)
    }

    pub fn file(path: impl Into<String>) -> Self {
        Probe::File(path.into())
    }

    pub fn exists(path: impl Into<String>) -> Self {
        Probe::Exists(path.into())
    }

    pub fn command(program: &'static str, args: &[&str]) -> Self {
        Probe::Command {
            program,
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn powershell(script: &str) -> Self {
        Self::command(
            "powershell",
            &["-NoProfile", "-NonInteractive", "-Command", script],
        )
    }

    async fn acquire<H: Host>(&self, host: &H) -> Result<String, ProbeError> {
        match self {
            Probe::Env(key) => host.env_var(key).ok_or(ProbeError::Unset(*key)),
            Probe::File(path) => host.read_file(path),
            Probe::Exists(path) => {
                if host.path_exists(path) {
                    Ok(path.clone())
                } else {
                    Err(ProbeError::Missing(path.clone()))
                }
            }
            Probe::Command { program, args } => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                host.run(program, &args).await
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Source {
    Probe(Probe),
    /// Two steps: the first output picks the probe that yields the value.
    Chained {
        first: Probe,
        then: fn(&str) -> Option<Probe>,
    },
}

impl Source {
    async fn acquire<H: Host>(&self, host: &H) -> Result<String, ProbeError> {
        match self {
            Source::Probe(probe) => probe.acquire(host).await,
            Source::Chained { first, then } => {
                let raw = first.acquire(host).await?;
                let next = then(&raw).ok_or_else(|| ProbeError::Parse(parse::excerpt(&raw)))?;
                next.acquire(host).await
            }
        }
    }
}

enum Attempt<T> {
    Adapter {
        source: Source,
        parser: fn(&str) -> Option<T>,
    },
    /// Captured earlier through a native API, or a constant sentinel.
    Ready(Option<T>),
}

pub struct Strategy<T> {
    name: &'static str,
    attempt: Attempt<T>,
}

impl<T> Strategy<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    async fn run<H: Host>(self, host: &H) -> Result<T, ProbeError> {
        match self.attempt {
            Attempt::Ready(value) => value.ok_or(ProbeError::Unavailable),
            Attempt::Adapter { source, parser } => {
                let raw = source.acquire(host).await?;
                parser(&raw).ok_or_else(|| ProbeError::Parse(parse::excerpt(&raw)))
            }
        }
    }
}

pub struct ProviderChain<T> {
    field: FieldKey,
    strategies: Vec<Strategy<T>>,
}

impl<T: Send> ProviderChain<T> {
    pub fn new(field: FieldKey) -> Self {
        Self {
            field,
            strategies: Vec::new(),
        }
    }

    pub fn field(&self) -> FieldKey {
        self.field
    }

    /// Strategy ids in the order they are tried.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(Strategy::name).collect()
    }

    pub fn probe(self, name: &'static str, probe: Probe, parse: fn(&str) -> Option<T>) -> Self {
        self.push(
            name,
            Attempt::Adapter {
                source: Source::Probe(probe),
                parser: parse,
            },
        )
    }

    pub fn chained(
        self,
        name: &'static str,
        first: Probe,
        then: fn(&str) -> Option<Probe>,
        parse: fn(&str) -> Option<T>,
    ) -> Self {
        self.push(
            name,
            Attempt::Adapter {
                source: Source::Chained { first, then },
                parser: parse,
            },
        )
    }

    pub fn ready(self, name: &'static str, value: Option<T>) -> Self {
        self.push(name, Attempt::Ready(value))
    }

    fn push(mut self, name: &'static str, attempt: Attempt<T>) -> Self {
        self.strategies.push(Strategy { name, attempt });
        self
    }

    /// Tries strategies in order; the first value wins.
    #[instrument(skip_all, fields(field = ?self.field))]
    pub async fn resolve<H: Host>(self, host: &H, policy: &FastModePolicy) -> Outcome<T> {
        let ProviderChain { field, strategies } = self;
        if policy.skips_field(field) {
            tracing::debug!("skipped by fast mode");
            return Outcome::Skipped;
        }

        let mut attempted = false;
        let mut removed_by_policy = false;
        for strategy in strategies {
            let name = strategy.name;
            if !policy.allows(field, name) {
                tracing::debug!(strategy = name, "strategy skipped by fast mode");
                removed_by_policy = true;
                continue;
            }
            attempted = true;
            match strategy.run(host).await {
                Ok(value) => {
                    tracing::debug!(strategy = name, "resolved");
                    return Outcome::Found(Field::new(value, name));
                }
                Err(e) => tracing::debug!(strategy = name, error = %e, "strategy failed"),
            }
        }

        // A chain with nothing to try on this platform is exhausted, not skipped.
        if removed_by_policy && !attempted {
            Outcome::Skipped
        } else {
            Outcome::Exhausted
        }
    }
}
