use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, Default)]
pub struct AccessControl {
    #[serde(default)]
    pub insecure_default_account: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ServerConfig {
    pub port: u16,
    pub site_base_url_path: String,
    #[serde(default)]
    pub fs_root_dir: std::path::PathBuf,

    #[serde(default)]
    pub access_control: AccessControl,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TbaConfig {
    #[serde(default = "default_tba_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
}

impl Default for TbaConfig {
    fn default() -> Self {
        Self {
            base_url: default_tba_base_url(),
            api_key: String::new(),
        }
    }
}

fn default_tba_base_url() -> String {
    "https://www.thebluealliance.com/api/v3".to_owned()
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StatboticsConfig {
    #[serde(default = "default_statbotics_base_url")]
    pub base_url: String,
}

impl Default for StatboticsConfig {
    fn default() -> Self {
        Self {
            base_url: default_statbotics_base_url(),
        }
    }
}

fn default_statbotics_base_url() -> String {
    "https://api.statbotics.io/v3".to_owned()
}

// Game-specific point and award constants. The teleop piece value is an
// assumption baked into match aggregation, not derived from game rules,
// hence configurable.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ScoringConfig {
    #[serde(default = "default_teleop_piece_points")]
    pub teleop_piece_points: i32,
    #[serde(default = "default_confirm_xp")]
    pub confirm_xp: i64,
    #[serde(default = "default_completion_xp")]
    pub completion_xp: i64,
    #[serde(default = "default_xp_per_level")]
    pub xp_per_level: i64,
    #[serde(default = "default_internal_weight")]
    pub internal_weight: f64,
    #[serde(default = "default_external_weight")]
    pub external_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            teleop_piece_points: default_teleop_piece_points(),
            confirm_xp: default_confirm_xp(),
            completion_xp: default_completion_xp(),
            xp_per_level: default_xp_per_level(),
            internal_weight: default_internal_weight(),
            external_weight: default_external_weight(),
        }
    }
}

fn default_teleop_piece_points() -> i32 {
    2
}
fn default_confirm_xp() -> i64 {
    10
}
fn default_completion_xp() -> i64 {
    5
}
fn default_xp_per_level() -> i64 {
    100
}
fn default_internal_weight() -> f64 {
    0.6
}
fn default_external_weight() -> f64 {
    0.4
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server_config: ServerConfig,
    #[serde(default)]
    pub tba_config: TbaConfig,
    #[serde(default)]
    pub statbotics_config: StatboticsConfig,
    #[serde(default)]
    pub scoring_config: ScoringConfig,
    pub db_path: String,
}

pub enum Insecure {
    Deny,
    Allow,
}

pub fn validate(cfg: &Config, insecure: Insecure) -> Result<(), String> {
    match insecure {
        Insecure::Allow => {}
        Insecure::Deny => {
            if cfg
                .server_config
                .access_control
                .insecure_default_account
                .is_some()
            {
                return Err("insecure_default_account is not allowed in secure mode".to_owned());
            }
        }
    }
    if cfg.scoring_config.xp_per_level <= 0 {
        return Err("xp_per_level must be positive".to_owned());
    }
    Ok(())
}
