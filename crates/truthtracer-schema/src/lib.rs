use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Status tag the analysis API uses for a completed facet.
pub const FULFILLED: &str = "fulfilled";

/// Claim text used when neither the response nor the caller supplied one.
pub const UNKNOWN_CLAIM: &str = "Unknown claim";

/// One analysed claim, as returned by the analysis API and as persisted locally.
///
/// Every nested part is optional: the API may omit any facet, and older saved
/// entries may predate a field. Absent parts render as placeholders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactResult {
    /// Assigned when the result is saved; absent on fresh API responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fact_check: Option<FactCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_chain: Option<TrustChain>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socratic: Option<Socratic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AnalysisStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<FactCheckSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheckSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Free-form label such as "High", "Medium" or "Low".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reliability: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustChain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_trust_chain: Option<bool>,
    /// In `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gaps: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<TrustSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// In `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reliability: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Socratic {
    #[serde(default, deserialize_with = "null_as_default")]
    pub reasoning_steps: Vec<ReasoningStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<Conclusion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implications: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conclusion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_validity: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_flaws: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub strengths: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<String>,
}

/// Per-facet completion tags plus the time the analysis was produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fact_check: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_chain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socratic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    FactCheck,
    TrustChain,
    Socratic,
}

impl Facet {
    pub const ALL: [Facet; 3] = [Facet::FactCheck, Facet::TrustChain, Facet::Socratic];

    pub fn label(self) -> &'static str {
        match self {
            Facet::FactCheck => "Fact check",
            Facet::TrustChain => "Trust chain analysis",
            Facet::Socratic => "Socratic analysis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Verdict {
    True,
    False,
    Misleading,
    #[default]
    Unverified,
}

impl Verdict {
    /// Case-insensitive; anything unrecognised is `Unverified`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Verdict::True,
            "false" => Verdict::False,
            "misleading" => Verdict::Misleading,
            _ => Verdict::Unverified,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::True => "True",
            Verdict::False => "False",
            Verdict::Misleading => "Misleading",
            Verdict::Unverified => "Unverified",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Verdict::parse(&raw))
    }
}

impl FactResult {
    pub fn new(claim: impl Into<String>) -> Self {
        Self {
            claim: Some(claim.into()),
            ..Self::default()
        }
    }

    /// Keep the response's claim if it has one, otherwise take the submitted query.
    pub fn with_claim_fallback(mut self, query: &str) -> Self {
        let has_claim = self
            .claim
            .as_deref()
            .is_some_and(|claim| !claim.trim().is_empty());
        if !has_claim {
            self.claim = Some(query.to_owned());
        }
        self
    }

    pub fn claim_text(&self) -> &str {
        self.claim
            .as_deref()
            .filter(|claim| !claim.trim().is_empty())
            .unwrap_or(UNKNOWN_CLAIM)
    }

    pub fn verdict(&self) -> Verdict {
        self.fact_check
            .as_ref()
            .and_then(|fc| fc.verdict)
            .unwrap_or_default()
    }

    pub fn facet_status(&self, facet: Facet) -> Option<&str> {
        let status = self.status.as_ref()?;
        match facet {
            Facet::FactCheck => status.fact_check.as_deref(),
            Facet::TrustChain => status.trust_chain.as_deref(),
            Facet::Socratic => status.socratic.as_deref(),
        }
    }

    pub fn facet_fulfilled(&self, facet: Facet) -> bool {
        self.facet_status(facet) == Some(FULFILLED)
    }

    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.status.as_ref()?.timestamp.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }

    /// Stamp `status.timestamp` unless the API already provided one.
    pub fn stamp_if_missing(&mut self, now: DateTime<Utc>) {
        let status = self.status.get_or_insert_with(AnalysisStatus::default);
        if status.timestamp.is_none() {
            status.timestamp = Some(now.to_rfc3339());
        }
    }
}

/// Round a `[0, 1]` score to a whole percentage.
pub fn confidence_percent(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    (value * 100.0).round().clamp(0.0, 100.0) as u8
}

pub fn generate_fact_id() -> String {
    format!("fact_{}", Uuid::new_v4().simple())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
