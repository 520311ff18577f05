// Offline submission payloads: a report serialized as a flat JSON
// object and carried as base64 text for manual copy or scan. The SVG
// pattern rendered next to it is a toy visual aid, not a scannable QR
// code.
use base64::prelude::*;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::engine::ReportFields;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OfflinePayload {
    // Present when the payload was produced from an already-saved
    // report; used to tell an identical rescan from a conflict.
    pub report_id: Option<i64>,
    pub match_id: i64,
    pub team_number: i32,
    pub scouter: String,
    #[serde(flatten)]
    pub fields: ReportFields,
}

#[derive(Debug, Display, PartialEq, Eq)]
pub enum DecodeError {
    #[display(fmt = "Invalid payload format (not valid base64).")]
    Base64,
    #[display(fmt = "Invalid payload data (not valid JSON).")]
    Json,
}

impl std::error::Error for DecodeError {}

pub fn encode(payload: &OfflinePayload) -> String {
    // Serializing a payload of plain fields cannot fail.
    let json = serde_json::to_vec(payload).unwrap_or_default();
    BASE64_STANDARD.encode(json)
}

pub fn decode(data: &str) -> Result<OfflinePayload, DecodeError> {
    let bytes = BASE64_STANDARD
        .decode(data.trim())
        .map_err(|_| DecodeError::Base64)?;
    serde_json::from_slice(&bytes).map_err(|_| DecodeError::Json)
}

const GRID_SIZE: usize = 25;
const CELL_PX: usize = 10;

/// Renders a QR-style grid pattern for the given payload text. Finder
/// squares in three corners, data cells from a per-character hash.
/// Decorative only.
pub fn pattern_svg(data: &str) -> String {
    let mut grid = [[false; GRID_SIZE]; GRID_SIZE];
    for i in 0..7 {
        for j in 0..7 {
            if i == 0 || i == 6 || j == 0 || j == 6 || ((2..=4).contains(&i) && (2..=4).contains(&j))
            {
                grid[i][j] = true;
                grid[i][GRID_SIZE - 1 - j] = true;
                grid[GRID_SIZE - 1 - i][j] = true;
            }
        }
    }
    for (idx, c) in data.chars().enumerate() {
        let mut hasher = DefaultHasher::new();
        (idx, c).hash(&mut hasher);
        let h = hasher.finish() as usize;
        let row = h % (GRID_SIZE - 8) + 7;
        let col = (h / (GRID_SIZE - 8)) % (GRID_SIZE - 8) + 7;
        grid[row][col] = (c as u32) % 2 == 1;
    }
    let px = GRID_SIZE * CELL_PX;
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {px} {px}\" \
         width=\"300\" height=\"300\"><rect width=\"{px}\" height=\"{px}\" fill=\"white\"/>"
    );
    for (row, cells) in grid.iter().enumerate() {
        for (col, filled) in cells.iter().enumerate() {
            if *filled {
                let x = col * CELL_PX;
                let y = row * CELL_PX;
                svg.push_str(&format!(
                    "<rect x=\"{x}\" y=\"{y}\" width=\"{CELL_PX}\" height=\"{CELL_PX}\" fill=\"black\"/>"
                ));
            }
        }
    }
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> OfflinePayload {
        OfflinePayload {
            report_id: Some(17),
            match_id: 3,
            team_number: 254,
            scouter: "casey".to_owned(),
            fields: ReportFields {
                auto_mobility: true,
                auto_pieces_scored: 2,
                auto_points_estimate: 8,
                teleop_pieces_scored: 6,
                teleop_defense_rating: 3,
                endgame_climb_attempted: true,
                endgame_climb_success: true,
                endgame_points_estimate: 10,
                fouls_committed: 1,
                overall_rating: 7,
                post_match_notes: "solid cycle times".to_owned(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn round_trip_reconstructs_all_fields() {
        let p = payload();
        let decoded = decode(&encode(&p)).unwrap();
        assert_eq!(decoded, p);
    }

    #[test]
    fn missing_optional_fields_default() {
        let raw = BASE64_STANDARD
            .encode(r#"{"report_id":null,"match_id":1,"team_number":9,"scouter":"sam"}"#);
        let decoded = decode(&raw).unwrap();
        assert_eq!(decoded.match_id, 1);
        assert_eq!(decoded.fields, ReportFields::default());
    }

    #[test]
    fn rejects_bad_base64() {
        assert_eq!(decode("not base64!!!").unwrap_err(), DecodeError::Base64);
    }

    #[test]
    fn rejects_bad_json() {
        let raw = BASE64_STANDARD.encode("this is not json");
        assert_eq!(decode(&raw).unwrap_err(), DecodeError::Json);
    }

    #[test]
    fn pattern_has_finder_corners() {
        let svg = pattern_svg("abc");
        assert!(svg.starts_with("<svg"));
        // Top-left finder corner cell.
        assert!(svg.contains("x=\"0\" y=\"0\""));
    }
}
