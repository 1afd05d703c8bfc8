/// Azure session acquisition via the Azure CLI.
///
/// The session is resolved once at the command boundary and handed to the
/// client by value. Nothing here is cached globally.
use std::fmt;
use std::process::{Command, Stdio};

use super::errors::GraphError;

/// Audience for ARM access tokens.
const MANAGEMENT_RESOURCE: &str = "https://management.azure.com";

/// `az` arguments printing an ARM access token.
const TOKEN_ARGS: &[&str] = &[
    "account",
    "get-access-token",
    "--resource",
    MANAGEMENT_RESOURCE,
    "--query",
    "accessToken",
];

/// Environment variable that supplies a pre-issued bearer token.
pub const TOKEN_ENV: &str = "AZURE_ACCESS_TOKEN";

/// An authenticated Azure session.
#[derive(Clone)]
pub struct Session {
    token: String,
    subscription_id: Option<String>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("subscription_id", &self.subscription_id)
            .finish()
    }
}

impl Session {
    /// Build a session from an already-known token.
    #[must_use]
    pub fn new(token: impl Into<String>, subscription_id: Option<String>) -> Self {
        Self {
            token: token.into(),
            subscription_id,
        }
    }

    /// Establish a session, logging in interactively if no Azure CLI login exists.
    ///
    /// A token in `AZURE_ACCESS_TOKEN` takes precedence over the Azure CLI.
    /// `subscription` overrides the CLI's current subscription. With
    /// `tenant` set and no override, no subscription is looked up.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NotAuthenticated` if no token can be obtained.
    pub fn establish(subscription: Option<&str>, tenant: bool) -> Result<Self, GraphError> {
        let token = match std::env::var(TOKEN_ENV) {
            Ok(t) if !t.trim().is_empty() => {
                tracing::debug!("using bearer token from {TOKEN_ENV}");
                t.trim().to_owned()
            }
            _ => cli_token()?,
        };

        let subscription_id = resolve_subscription(subscription, tenant, current_subscription);
        Ok(Self::new(token, subscription_id))
    }

    /// Bearer token for the `Authorization` header.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The subscription queries are scoped to unless tenant scope is requested.
    #[must_use]
    pub fn subscription_id(&self) -> Option<&str> {
        self.subscription_id.as_deref()
    }
}

/// Explicit override first; otherwise `lookup`, unless the query is tenant-wide.
fn resolve_subscription<F>(explicit: Option<&str>, tenant: bool, lookup: F) -> Option<String>
where
    F: FnOnce() -> Option<String>,
{
    match explicit {
        Some(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        _ if tenant => None,
        _ => lookup(),
    }
}

fn cli_token() -> Result<String, GraphError> {
    match az_tsv(TOKEN_ARGS) {
        Ok(token) => Ok(token),
        Err(first) => {
            tracing::info!(reason = %first, "no Azure session, starting interactive login");
            eprintln!("No Azure session found. Launching 'az login'...");
            login()?;
            az_tsv(TOKEN_ARGS).map_err(GraphError::NotAuthenticated)
        }
    }
}

fn current_subscription() -> Option<String> {
    match az_tsv(&["account", "show", "--query", "id"]) {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::warn!(reason = %e, "could not determine current subscription");
            None
        }
    }
}

fn login() -> Result<(), GraphError> {
    let status = Command::new("az")
        .arg("login")
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| GraphError::NotAuthenticated(format!("cannot run 'az login': {e}")))?;
    if status.success() {
        Ok(())
    } else {
        Err(GraphError::NotAuthenticated(format!(
            "'az login' exited with {status}"
        )))
    }
}

/// Run `az <args> -o tsv` and return trimmed stdout, or stderr as the error.
fn az_tsv(args: &[&str]) -> Result<String, String> {
    let output = Command::new("az")
        .args(args)
        .args(["-o", "tsv"])
        .stdin(Stdio::null())
        .output()
        .map_err(|e| format!("cannot run Azure CLI: {e}"))?;

    if !output.status.success() {
        return Err(String::from_utf8_lossy(&output.stderr).trim().to_owned());
    }

    let value = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    if value.is_empty() {
        Err(format!("'az {}' returned nothing", args.join(" ")))
    } else {
        Ok(value)
    }
}
