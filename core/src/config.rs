use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the three per-field passes of indexing and query resolution are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanOut {
    /// Name, description and keyword are processed one after another.
    #[default]
    Sequential,
    /// The three fields run as joined tasks on the rayon pool.
    PerField,
}

impl std::str::FromStr for FanOut {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(FanOut::Sequential),
            "per_field" | "per-field" => Ok(FanOut::PerField),
            other => Err(format!("unknown fan-out mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Interval between background index rebuilds.
    #[serde(default = "default_refresh_interval", with = "duration_secs")]
    pub refresh_interval: Duration,
    #[serde(default)]
    pub fan_out: FanOut,
    /// Upper bound on hydrated search results.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_refresh_interval() -> Duration { Duration::from_secs(30) }
fn default_max_results() -> usize { 100 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            refresh_interval: default_refresh_interval(),
            fan_out: FanOut::default(),
            max_results: default_max_results(),
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}
