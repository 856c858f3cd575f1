//! Double round-robin fixture generation.

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Match, MatchIdSequence, TeamId};

pub const MATCH_DAYS_PER_WEEK: i64 = 2;
pub const ROUNDS: usize = 2;

/// Every pair of teams meets once per round with home and away swapped on odd rounds,
/// giving `n * (n - 1)` matches.
///
/// Matchups are shuffled, then packed greedily into two match days per week so that no
/// team plays twice on one day. Each match carries the index of the week it falls in.
pub fn generate_schedule<R: Rng>(
    teams: &[TeamId],
    start: NaiveDate,
    best_of: u8,
    ids: &mut MatchIdSequence,
    rng: &mut R,
) -> Vec<Match> {
    if teams.len() < 2 {
        return Vec::new();
    }

    let mut matchups = Vec::with_capacity(teams.len() * (teams.len() - 1));
    for round in 0..ROUNDS {
        for (i, home) in teams.iter().enumerate() {
            for away in &teams[i + 1..] {
                if round % 2 == 0 {
                    matchups.push((*home, *away));
                } else {
                    matchups.push((*away, *home));
                }
            }
        }
    }
    matchups.shuffle(rng);

    let per_day = teams.len() / 2;
    let mut schedule = Vec::with_capacity(matchups.len());
    let mut week = 0u32;
    let mut week_start = start;

    while !matchups.is_empty() {
        for day in 0..MATCH_DAYS_PER_WEEK {
            let date = week_start + Duration::days(day);
            let mut busy: Vec<TeamId> = Vec::with_capacity(per_day * 2);
            for _ in 0..per_day {
                let free = matchups
                    .iter()
                    .position(|(home, away)| !busy.contains(home) && !busy.contains(away));
                let Some(index) = free else {
                    break;
                };
                let (home, away) = matchups.remove(index);
                busy.push(home);
                busy.push(away);
                schedule.push(Match::new(ids.next_id(), home, away, date, best_of).with_week(week));
            }
        }
        week += 1;
        week_start += Duration::days(7);
    }

    schedule
}
