use crate::catalog::{self, RANK_TIERS, RankTier};
use crate::models::{DailyEntry, DayScore, SummaryResponse, TimeContext};
use chrono::{Duration, Local, NaiveDate};

const FULL_DAY_XP: u32 = 10;
const PARTIAL_DAY_XP: u32 = 5;
const FULL_HABIT_RATIO: f64 = 0.75;
const PARTIAL_HABIT_RATIO: f64 = 0.4;
const CHAPTER_DAYS: i64 = 7;
const SEASON_DAYS: i64 = 90;

/// Score for a single day: 10 for a workout plus most habits, 5 for either
/// a workout or a fair share of habits, otherwise 0.
pub fn daily_xp(entry: &DailyEntry) -> u32 {
    let ratio = habit_ratio(entry);
    if entry.workout_done && ratio > FULL_HABIT_RATIO {
        FULL_DAY_XP
    } else if entry.workout_done || ratio > PARTIAL_HABIT_RATIO {
        PARTIAL_DAY_XP
    } else {
        0
    }
}

/// Fraction of the meal and posture checklists ticked, in `[0, 1]`.
pub fn habit_ratio(entry: &DailyEntry) -> f64 {
    let meals = catalog::MEALS
        .iter()
        .filter(|item| entry.meals.get(item.id).copied().unwrap_or(false))
        .count();
    let posture = catalog::POSTURE
        .iter()
        .filter(|item| entry.posture.get(item.id).copied().unwrap_or(false))
        .count();
    let slots = catalog::MEALS.len() + catalog::POSTURE.len();
    (meals + posture) as f64 / slots as f64
}

pub fn total_xp(entries: &[DailyEntry]) -> u64 {
    entries.iter().map(|entry| u64::from(entry.daily_xp)).sum()
}

/// Highest tier whose threshold does not exceed `total`.
pub fn rank_for(total: u64) -> &'static RankTier {
    let mut best = &RANK_TIERS[0];
    for tier in RANK_TIERS {
        if total >= tier.min_xp {
            best = tier;
        }
    }
    best
}

pub fn next_rank(current: &RankTier) -> Option<&'static RankTier> {
    let idx = RANK_TIERS.iter().position(|tier| tier.name == current.name)?;
    RANK_TIERS.get(idx + 1)
}

pub fn rank_progress(total: u64, current: &RankTier, next: &RankTier) -> f64 {
    let span = next.min_xp.saturating_sub(current.min_xp).max(1) as f64;
    let gained = total.saturating_sub(current.min_xp) as f64;
    (gained / span * 100.0).min(100.0)
}

/// Consecutive positive-score days ending today, or ending yesterday when
/// today has nothing logged yet. `entries` must be sorted by date.
pub fn streak(entries: &[DailyEntry], today: NaiveDate) -> u32 {
    let xp_on = |date: NaiveDate| {
        entries
            .binary_search_by_key(&date, |entry| entry.date)
            .ok()
            .map(|idx| entries[idx].daily_xp)
    };

    let mut cursor = match xp_on(today) {
        Some(xp) if xp > 0 => today,
        _ => today - Duration::days(1),
    };

    // Every counted day consumes a distinct entry, so the walk is bounded by the list length.
    let mut count = 0;
    while count < entries.len() {
        match xp_on(cursor) {
            Some(xp) if xp > 0 => {
                count += 1;
                cursor = cursor - Duration::days(1);
            }
            _ => break,
        }
    }
    count as u32
}

pub fn time_context(entries: &[DailyEntry], today: NaiveDate) -> TimeContext {
    let diff = entries
        .iter()
        .map(|entry| entry.date)
        .min()
        .map(|first| (today - first).num_days() + 1)
        .unwrap_or(1)
        .max(1);

    TimeContext {
        season: ceil_div(diff, SEASON_DAYS) as u32,
        chapter: ceil_div(diff, CHAPTER_DAYS) as u32,
        day_in_chapter: ((diff - 1) % CHAPTER_DAYS + 1) as u32,
        total_days: diff as u32,
    }
}

pub fn build_summary(entries: &[DailyEntry], insight: String) -> SummaryResponse {
    build_summary_at(Local::now().date_naive(), entries, insight)
}

pub fn build_summary_at(today: NaiveDate, entries: &[DailyEntry], insight: String) -> SummaryResponse {
    let total = total_xp(entries);
    let rank = rank_for(total);
    let next = next_rank(rank);

    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let xp = entries
            .iter()
            .find(|entry| entry.date == date)
            .map(|entry| entry.daily_xp)
            .unwrap_or(0);
        last_7_days.push(DayScore {
            date: date_key(date),
            xp,
        });
    }

    SummaryResponse {
        today: date_key(today),
        total_xp: total,
        rank,
        next_rank: next,
        progress_percent: next.map(|next| rank_progress(total, rank, next)),
        streak: streak(entries, today),
        time: time_context(entries, today),
        last_7_days,
        insight,
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn ceil_div(value: i64, by: i64) -> i64 {
    (value + by - 1) / by
}
