//! Segment → resolve → classify for a batch of newly seen games.

use crate::classify::{
    classify, drive_end, field_goal_by, is_suppressed_late_loss, latest_first, touchdown_by,
    DriveFacts,
};
use crate::detail::{
    format_deficit, format_down, format_yards_to_go, meaningful_final_play, postseason_week_label,
};
use crate::ledger::NewGames;
use crate::models::{ClassifiedDrive, LegacyDriveRow, Opportunity, Period, PlayEvent, SeasonType};
use crate::resolve::{resolve_player, NameSources};
use crate::segment::{segment, Candidate};
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Classifies one candidate drive. `None` drops the candidate: no end-of-drive
/// scores, or a Q4 drive starting at 0:30 or less that failed.
pub fn classify_candidate(
    candidate: &Candidate<'_>,
    drive: &[&PlayEvent],
    names: &NameSources<'_>,
) -> Option<ClassifiedDrive> {
    let start = candidate.start;
    let offense = start.posteam.as_deref();
    let player = resolve_player(drive, offense, names);

    let ordered = latest_first(drive);
    let Some(end) = drive_end(&ordered) else {
        log::debug!(
            "Skipping {} drive {}: no end-of-drive score",
            candidate.key.game_id,
            candidate.key.drive
        );
        return None;
    };

    let facts = DriveFacts {
        period: candidate.period,
        season_type: start.season_type,
        season: start.season,
        ot_rank: candidate.ot_rank.unwrap_or(1),
        touchdown: touchdown_by(&ordered, offense),
        field_goal: field_goal_by(&ordered, offense),
        end_team_score: end.team_score,
        end_opp_score: end.opp_score,
    };
    let outcome = classify(&facts);

    if is_suppressed_late_loss(candidate.period, start.quarter_seconds_remaining, outcome.result) {
        log::debug!(
            "Skipping {} drive {}: late Q4 failure",
            candidate.key.game_id,
            candidate.key.drive
        );
        return None;
    }

    let final_play = meaningful_final_play(&ordered);
    let week_label = match start.season_type {
        SeasonType::Post => postseason_week_label(start.season, start.week).map(str::to_string),
        SeasonType::Regular => None,
    };

    let row = LegacyDriveRow {
        season_type: start.season_type,
        qb_id: Some(player.id.clone()),
        qb_name: Some(player.name),
        season: start.season,
        week: start.week,
        week_label,
        away_team: start.away_team.clone(),
        home_team: start.home_team.clone(),
        game_id: candidate.key.game_id.clone(),
        period: candidate.period,
        start_score_diff: format_deficit(candidate.score_diff),
        start_time: start.time.clone(),
        end_time: end.last_play.time.clone(),
        final_down: format_down(final_play.and_then(|p| p.down)),
        final_ydstogo: format_yards_to_go(final_play.and_then(|p| p.ydstogo)),
        final_play: final_play.and_then(|p| p.desc.clone()),
        end_team_score: end.team_score,
        end_opp_score: end.opp_score,
        result: outcome.result,
        reason: outcome.reason,
    };

    Some(ClassifiedDrive {
        opportunity: Opportunity {
            qb_id: player.id,
            result: outcome.result,
            season_type: start.season_type,
        },
        row,
    })
}

/// Classifies every opportunity drive of `new_games`. Candidates are
/// classified in parallel and collected in segmentation order, so the output
/// is deterministic for a fixed input.
pub fn process_new_games(
    plays: &[PlayEvent],
    new_games: &BTreeSet<String>,
    names: &NameSources<'_>,
) -> NewGames {
    let fresh: Vec<&PlayEvent> = plays.iter().filter(|p| new_games.contains(&p.game_id)).collect();
    let game_ids: BTreeSet<String> = fresh.iter().map(|p| p.game_id.clone()).collect();

    let seg = segment(fresh.iter().copied());
    log::debug!(
        "Segmented {} Q4 / {} OT drives into {} candidates",
        seg.q4.len(),
        seg.ot.len(),
        seg.candidates.len()
    );

    let drives: Vec<ClassifiedDrive> = seg
        .candidates
        .par_iter()
        .filter_map(|candidate| {
            let Some(drive) = seg.drive_plays(candidate) else {
                log::debug!(
                    "Skipping {} drive {}: plays not found",
                    candidate.key.game_id,
                    candidate.key.drive
                );
                return None;
            };
            classify_candidate(candidate, drive, names)
        })
        .collect();

    let q4 = drives.iter().filter(|d| d.row.period == Period::Q4).count();
    log::info!(
        "Classified {} opportunities ({} Q4, {} OT) from {} games",
        drives.len(),
        q4,
        drives.len() - q4,
        game_ids.len()
    );

    NewGames { drives, game_ids }
}
