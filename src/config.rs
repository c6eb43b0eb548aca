use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const APP_NAME: &str = "gmail_report";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8080/callback";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub client_id: String,
    pub user_email: Option<String>,
    pub redirect_uri: Option<String>,
    /// Google "installed app" client secret JSON; overrides client_id.
    pub client_secret_file: Option<String>,
    #[serde(default)]
    pub report: ReportConfig,
}

/// What to search for and how to cut the matching mails into lines.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub query: Option<String>,
    pub regex: String,
    pub skip_lines_starting_with: Vec<String>,
    pub line_separator: String,
    pub limit: Option<usize>,
    pub mime_type: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            query: Some("subject:\"YARN Daily unit test report\"".to_string()),
            regex: r".*org\.apache\.hadoop\.yarn.*".to_string(),
            skip_lines_starting_with: vec!["Failed testcases:".to_string(), "FILTER:".to_string()],
            line_separator: "\r\n".to_string(),
            limit: Some(1),
            mime_type: "text/plain".to_string(),
        }
    }
}

impl Config {
    pub fn redirect_uri(&self) -> &str {
        self.redirect_uri.as_deref().unwrap_or(DEFAULT_REDIRECT_URI)
    }
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("no config dir available"))?
        .join(APP_NAME))
}

pub fn config_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("config.toml");
    Ok(p)
}

pub fn template() -> Config {
    Config {
        client_id: "YOUR_CLIENT_ID.apps.googleusercontent.com".to_string(),
        user_email: Some("you@example.com".to_string()),
        redirect_uri: Some(DEFAULT_REDIRECT_URI.to_string()),
        client_secret_file: None,
        report: ReportConfig::default(),
    }
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

pub fn load_config() -> Result<Config> {
    let path = config_path()?;
    if !path.exists() {
        // create a template config for users to edit
        fs::write(&path, toml::to_string_pretty(&template())?)?;
        return Err(anyhow::anyhow!(
            "Created template config at {}; edit it and run again",
            path.display()
        ));
    }
    parse_config(&fs::read_to_string(path)?)
}
