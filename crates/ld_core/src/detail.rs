//! Display fields of a `LegacyDriveRow`.

use crate::models::PlayEvent;

/// Play types that never describe how a drive ended.
const NOISE_PLAY_TYPES: [&str; 2] = ["extra_point", "two_point_attempt"];

fn is_meaningful(play: &PlayEvent) -> bool {
    if play.play_type.as_deref().is_some_and(|t| NOISE_PLAY_TYPES.contains(&t)) {
        return false;
    }
    let desc = play.desc.as_deref().unwrap_or("");
    let trimmed = desc.trim();
    !desc.contains("END GAME")
        && !trimmed.starts_with("Timeout")
        && !trimmed.starts_with("TWO-POINT ATTEMPT")
}

/// Latest play that says something about the drive (skips conversions,
/// timeouts and end-of-game markers). Falls back to the latest play.
pub fn meaningful_final_play<'a>(latest_first: &[&'a PlayEvent]) -> Option<&'a PlayEvent> {
    latest_first
        .iter()
        .copied()
        .find(|p| is_meaningful(p))
        .or_else(|| latest_first.first().copied())
}

/// Postseason round for a week. The 2021 season added a regular-season week.
pub fn postseason_week_label(season: Option<i32>, week: Option<i32>) -> Option<&'static str> {
    let (season, week) = (season?, week?);
    let first_round = if season <= 2020 { 18 } else { 19 };
    match week.checked_sub(first_round)? {
        0 => Some("WC"),
        1 => Some("DIV"),
        2 => Some("CC"),
        3 => Some("SB"),
        _ => None,
    }
}

pub fn format_down(down: Option<i32>) -> Option<String> {
    down.filter(|d| *d > 0).map(|d| format!("{}down", d))
}

pub fn format_yards_to_go(yards: Option<i32>) -> Option<String> {
    yards.filter(|y| *y > 0).map(|y| format!("{}yrdstogo", y))
}

pub fn format_deficit(score_diff: Option<i32>) -> Option<String> {
    score_diff.map(|d| format!("down {}", d.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::play;

    fn described(play_id: u32, play_type: &str, desc: &str) -> PlayEvent {
        let mut p = play("g1", 1, play_id);
        p.play_type = Some(play_type.to_string());
        p.desc = Some(desc.to_string());
        p
    }

    #[test]
    fn test_meaningful_final_play_skips_noise() {
        let end = described(5, "no_play", "END GAME");
        let xp = described(4, "extra_point", "H.Butker extra point is GOOD");
        let timeout = described(3, "no_play", " Timeout #1 by DEN");
        let td = described(2, "pass", "P.Mahomes pass short right to T.Kelce for 5 yards, TOUCHDOWN");
        let drive = vec![&end, &xp, &timeout, &td];
        assert_eq!(meaningful_final_play(&drive).map(|p| p.play_id), Some(2));
    }

    #[test]
    fn test_meaningful_final_play_falls_back_to_latest() {
        let end = described(5, "no_play", "END GAME");
        let two = described(4, "two_point_attempt", "TWO-POINT ATTEMPT fails");
        let drive = vec![&end, &two];
        assert_eq!(meaningful_final_play(&drive).map(|p| p.play_id), Some(5));
        assert!(meaningful_final_play(&[]).is_none());
    }

    #[test]
    fn test_postseason_week_labels() {
        assert_eq!(postseason_week_label(Some(2019), Some(18)), Some("WC"));
        assert_eq!(postseason_week_label(Some(2020), Some(21)), Some("SB"));
        assert_eq!(postseason_week_label(Some(2021), Some(18)), None);
        assert_eq!(postseason_week_label(Some(2021), Some(19)), Some("WC"));
        assert_eq!(postseason_week_label(Some(2023), Some(21)), Some("CC"));
        assert_eq!(postseason_week_label(Some(2023), Some(22)), Some("SB"));
        assert_eq!(postseason_week_label(None, Some(22)), None);
        assert_eq!(postseason_week_label(Some(2023), Some(i32::MIN)), None);
    }

    #[test]
    fn test_down_distance_formatting() {
        assert_eq!(format_down(Some(3)).as_deref(), Some("3down"));
        assert_eq!(format_down(Some(0)), None);
        assert_eq!(format_yards_to_go(Some(10)).as_deref(), Some("10yrdstogo"));
        assert_eq!(format_yards_to_go(None), None);
        assert_eq!(format_deficit(Some(-6)).as_deref(), Some("down 6"));
    }
}
