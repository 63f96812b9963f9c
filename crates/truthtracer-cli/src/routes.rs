use std::fmt;

use anyhow::{anyhow, Result};
use reqwest::Url;

const RESULT_PATH: &str = "/facts/result";
const FACTS_PREFIX: &str = "/facts/";
const ROUTE_BASE: &str = "http://localhost/";

/// Navigable views: `/`, `/facts/result?query=<claim>` and `/facts/<id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Result { query: String },
    Saved { id: String },
}

impl Route {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let url = Url::parse(ROUTE_BASE)
            .and_then(|base| base.join(raw))
            .map_err(|e| anyhow!("invalid route '{raw}': {e}"))?;

        let mut segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.collect())
            .unwrap_or_default();
        while segments.last().is_some_and(|s| s.is_empty()) {
            segments.pop();
        }

        match segments.as_slice() {
            [] => Ok(Self::Home),
            ["facts", "result"] => {
                let query = url
                    .query_pairs()
                    .find(|(key, _)| key == "query")
                    .map(|(_, value)| value.into_owned())
                    .unwrap_or_default();
                Ok(Self::Result { query })
            }
            ["facts", id] if !id.is_empty() => {
                let id = urlencoding::decode(id)
                    .map_err(|e| anyhow!("invalid percent-encoding in route: {e}"))?;
                Ok(Self::Saved { id: id.into_owned() })
            }
            _ => Err(anyhow!("unknown route: {raw}")),
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Result { query } => {
                format!("{RESULT_PATH}?query={}", urlencoding::encode(query))
            }
            Self::Saved { id } => format!("{FACTS_PREFIX}{}", urlencoding::encode(id)),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}
