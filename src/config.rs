use crate::error::{Error, Result};
use std::time::Duration;

pub(crate) const DOMAIN: &str = "firestore.googleapis.com";
pub(crate) const SCOPE: &str = "https://www.googleapis.com/auth/datastore";
pub const DEFAULT_DATABASE: &str = "(default)";

pub const EMULATOR_HOST_ENV: &str = "FIRESTORE_EMULATOR_HOST";
pub const DATABASE_ID_ENV: &str = "FIRESTORE_DATABASE_ID";

/// Settings shared by every session a client opens.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Host of the Firestore API, without scheme.
    pub domain: String,
    pub database_id: String,
    pub scopes: Vec<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Option<Duration>,
    /// Page size used when listing collection ids.
    pub page_size: i32,
    /// `host:port` of a local emulator; plain HTTP and no credentials when set.
    pub emulator_host: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            domain: DOMAIN.to_string(),
            database_id: DEFAULT_DATABASE.to_string(),
            scopes: vec![SCOPE.to_string()],
            connect_timeout: Duration::from_secs(10),
            request_timeout: Some(Duration::from_secs(60)),
            page_size: 300,
            emulator_host: None,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `FIRESTORE_EMULATOR_HOST` and `FIRESTORE_DATABASE_ID`.
    pub fn from_env() -> Self {
        let mut config = ClientConfig::default();
        if let Some(host) = non_empty_var(EMULATOR_HOST_ENV) {
            config.emulator_host = Some(host);
        }
        if let Some(database_id) = non_empty_var(DATABASE_ID_ENV) {
            config.database_id = database_id;
        }
        config
    }

    pub fn with_database_id(mut self, database_id: impl Into<String>) -> Self {
        self.database_id = database_id.into();
        self
    }

    pub fn with_emulator_host(mut self, host: impl Into<String>) -> Self {
        self.emulator_host = Some(host.into());
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub(crate) fn scopes(&self) -> Vec<&str> {
        self.scopes.iter().map(String::as_str).collect()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

/// A parsed `http[s]://host[:port]/projects/{project}[/databases/{database}]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseUrl {
    pub scheme: Scheme,
    pub authority: String,
    pub project_id: String,
    pub database_id: String,
}

impl DatabaseUrl {
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::Connection(format!("invalid database url {:?}: {}", input, reason));

        let uri: http::Uri = input.parse().map_err(|_| invalid("not a url"))?;
        let scheme = match uri.scheme_str() {
            Some("https") => Scheme::Https,
            Some("http") => Scheme::Http,
            Some(_) => return Err(invalid("scheme must be http or https")),
            None => return Err(invalid("missing scheme")),
        };
        let authority = uri
            .authority()
            .map(|a| a.as_str().to_string())
            .filter(|a| !a.is_empty())
            .ok_or_else(|| invalid("missing host"))?;

        let segments: Vec<&str> = uri.path().split('/').filter(|s| !s.is_empty()).collect();
        let (project_id, database_id) = match segments.as_slice() {
            ["projects", project] => (project.to_string(), DEFAULT_DATABASE.to_string()),
            ["projects", project, "databases", database] => {
                (project.to_string(), database.to_string())
            }
            _ => return Err(invalid("path must be /projects/{project}[/databases/{database}]")),
        };
        validate_project_id(&project_id).map_err(|_| invalid("malformed project id"))?;

        Ok(DatabaseUrl {
            scheme,
            authority,
            project_id,
            database_id,
        })
    }

    pub fn endpoint(&self) -> String {
        match self.scheme {
            Scheme::Http => format!("http://{}", self.authority),
            Scheme::Https => format!("https://{}", self.authority),
        }
    }

    /// Host without port, used as the TLS server name.
    pub fn host(&self) -> &str {
        self.authority
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or(&self.authority)
    }
}

/// Project ids are lowercase letters, digits and hyphens; domain-scoped ids also carry `.` and `:`.
pub fn validate_project_id(project_id: &str) -> Result<()> {
    if project_id.trim().is_empty() {
        return Err(Error::Authentication("project id is empty".into()));
    }
    let valid = project_id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | ':'));
    if !valid || project_id.len() > 100 {
        return Err(Error::Authentication(format!(
            "malformed project id {:?}",
            project_id
        )));
    }
    Ok(())
}
