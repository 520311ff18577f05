// Predictive-metrics provider adapter. The upstream response nests the
// rating under several optional layers whose shape has drifted between
// API versions, so fields are pulled out of a serde_json::Value one by
// one and each degrades to None independently.
use serde_json::Value;

use crate::config::StatboticsConfig;

#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TeamMetrics {
    pub epa: Option<f64>,
    pub auto_epa: Option<f64>,
    pub teleop_epa: Option<f64>,
    pub endgame_epa: Option<f64>,
    pub win_rate: Option<f64>,
    pub rank: Option<i32>,
}

impl Client {
    pub fn new(config: &StatboticsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
        }
    }

    pub async fn team_event(&self, team_number: i32, event_key: &str) -> Option<TeamMetrics> {
        let v = self
            .get_json(&format!("/team_event/{team_number}/{event_key}"))
            .await?;
        Some(metrics_from_value(&v))
    }

    pub async fn team_year(&self, team_number: i32, year: i32) -> Option<TeamMetrics> {
        let v = self
            .get_json(&format!("/team_year/{team_number}/{year}"))
            .await?;
        Some(metrics_from_value(&v))
    }

    async fn get_json(&self, path: &str) -> Option<Value> {
        let url = format!("{}{path}", self.base_url);
        let response = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                log::error!("Metrics provider request {url} failed: {e:?}");
                return None;
            }
        };
        if !response.status().is_success() {
            log::warn!(
                "Metrics provider request {url} returned status {}",
                response.status()
            );
            return None;
        }
        match response.json::<Value>().await {
            Ok(v) => Some(v),
            Err(e) => {
                log::error!("Metrics provider response {url} failed to parse: {e:?}");
                None
            }
        }
    }
}

pub fn metrics_from_value(v: &Value) -> TeamMetrics {
    let epa = v.get("epa");
    let breakdown = epa.and_then(|e| e.get("breakdown"));
    // total_points is either a bare number or an object with a "mean".
    let total = epa.and_then(|e| e.get("total_points")).and_then(|t| {
        t.as_f64()
            .or_else(|| t.get("mean").and_then(Value::as_f64))
    });
    let rank = v
        .get("rank")
        .and_then(Value::as_i64)
        .or_else(|| {
            epa.and_then(|e| e.get("ranks"))
                .and_then(|r| r.get("total"))
                .and_then(|t| t.get("rank"))
                .and_then(Value::as_i64)
        })
        .map(|r| r as i32);
    TeamMetrics {
        epa: total,
        auto_epa: breakdown
            .and_then(|b| b.get("auto_points"))
            .and_then(Value::as_f64),
        teleop_epa: breakdown
            .and_then(|b| b.get("teleop_points"))
            .and_then(Value::as_f64),
        endgame_epa: breakdown
            .and_then(|b| b.get("endgame_points"))
            .and_then(Value::as_f64),
        win_rate: v
            .get("record")
            .and_then(|r| r.get("winrate"))
            .and_then(Value::as_f64),
        rank,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_nested_mean_shape() {
        let v = json!({
            "epa": {
                "total_points": {"mean": 42.5},
                "breakdown": {
                    "auto_points": 12.0,
                    "teleop_points": 20.5,
                    "endgame_points": 10.0,
                },
                "ranks": {"total": {"rank": 7}},
            },
            "record": {"winrate": 0.64},
        });
        let m = metrics_from_value(&v);
        assert_eq!(m.epa, Some(42.5));
        assert_eq!(m.auto_epa, Some(12.0));
        assert_eq!(m.teleop_epa, Some(20.5));
        assert_eq!(m.endgame_epa, Some(10.0));
        assert_eq!(m.win_rate, Some(0.64));
        assert_eq!(m.rank, Some(7));
    }

    #[test]
    fn parses_flat_shape_and_top_level_rank() {
        let v = json!({
            "epa": {"total_points": 33.0},
            "rank": 3,
        });
        let m = metrics_from_value(&v);
        assert_eq!(m.epa, Some(33.0));
        assert_eq!(m.rank, Some(3));
        assert_eq!(m.win_rate, None);
    }

    #[test]
    fn missing_fields_degrade_to_unknown() {
        let m = metrics_from_value(&json!({}));
        assert_eq!(m, TeamMetrics::default());
    }
}
