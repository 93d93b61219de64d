//! The entry collection and the update rule for today's record.

use crate::catalog;
use crate::models::{DailyEntry, EntryUpdate, Toggle};
use crate::sanitize::normalize;
use crate::stats;
use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// Date-ordered entries with at most one record per date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryLog {
    entries: Vec<DailyEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidUpdate {
    #[error("unknown meal id '{0}'")]
    UnknownMeal(String),

    #[error("unknown posture id '{0}'")]
    UnknownPosture(String),

    #[error("exercise index {index} is outside today's plan of {len}")]
    ExerciseOutOfPlan { index: u32, len: usize },
}

impl EntryLog {
    pub fn new(entries: Vec<DailyEntry>) -> Self {
        Self {
            entries: normalize(entries),
        }
    }

    pub fn entries(&self) -> &[DailyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyEntry> {
        self.entries
            .binary_search_by_key(&date, |entry| entry.date)
            .ok()
            .map(|idx| &self.entries[idx])
    }

    /// The stored record for `date`, or an unsaved blank one.
    pub fn entry_or_placeholder(&self, date: NaiveDate) -> DailyEntry {
        self.get(date)
            .cloned()
            .unwrap_or_else(|| DailyEntry::placeholder(date))
    }

    /// Inserts or replaces the record for `entry.date`, keeping date order.
    pub fn upsert(&mut self, entry: DailyEntry) {
        match self
            .entries
            .binary_search_by_key(&entry.date, |existing| existing.date)
        {
            Ok(idx) => self.entries[idx] = entry,
            Err(idx) => self.entries.insert(idx, entry),
        }
    }

    pub fn total_xp(&self) -> u64 {
        stats::total_xp(&self.entries)
    }

    /// Merges `update` into the record for `date`, rescoring it and storing
    /// the result. Returns the stored record.
    pub fn apply(&mut self, date: NaiveDate, update: EntryUpdate) -> Result<DailyEntry, InvalidUpdate> {
        validate(date, &update)?;
        Ok(self.merge(date, update))
    }

    /// Flips one flag on the record for `date`. Only the flipped id is
    /// checked; other keys already stored in the same map are carried over.
    pub fn toggle(&mut self, date: NaiveDate, toggle: Toggle) -> Result<DailyEntry, InvalidUpdate> {
        validate_toggle(date, &toggle)?;
        let update = toggle_update(&self.entry_or_placeholder(date), toggle);
        Ok(self.merge(date, update))
    }

    fn merge(&mut self, date: NaiveDate, update: EntryUpdate) -> DailyEntry {
        let mut entry = self.entry_or_placeholder(date);
        if let Some(done) = update.workout_done {
            entry.workout_done = done;
        }
        if let Some(planned) = update.sleep_planned {
            entry.sleep_planned = planned;
        }
        if let Some(meals) = update.meals {
            entry.meals = meals;
        }
        if let Some(posture) = update.posture {
            entry.posture = posture;
        }
        if let Some(exercises) = update.exercises {
            entry.exercises = exercises;
        }
        entry.daily_xp = stats::daily_xp(&entry);

        self.upsert(entry.clone());
        entry
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Builds the partial update for a single flip, merging at the map level.
pub fn toggle_update(current: &DailyEntry, toggle: Toggle) -> EntryUpdate {
    match toggle {
        Toggle::Workout => EntryUpdate {
            workout_done: Some(!current.workout_done),
            ..EntryUpdate::default()
        },
        Toggle::Sleep => EntryUpdate {
            sleep_planned: Some(!current.sleep_planned),
            ..EntryUpdate::default()
        },
        Toggle::Meal(id) => {
            let mut meals = current.meals.clone();
            let flag = meals.entry(id).or_insert(false);
            *flag = !*flag;
            EntryUpdate {
                meals: Some(meals),
                ..EntryUpdate::default()
            }
        }
        Toggle::Posture(id) => {
            let mut posture = current.posture.clone();
            let flag = posture.entry(id).or_insert(false);
            *flag = !*flag;
            EntryUpdate {
                posture: Some(posture),
                ..EntryUpdate::default()
            }
        }
        Toggle::Exercise(index) => {
            let mut exercises = current.exercises.clone();
            let flag = exercises.entry(index).or_insert(false);
            *flag = !*flag;
            EntryUpdate {
                exercises: Some(exercises),
                ..EntryUpdate::default()
            }
        }
    }
}

fn validate_toggle(date: NaiveDate, toggle: &Toggle) -> Result<(), InvalidUpdate> {
    match toggle {
        Toggle::Meal(id) if !catalog::is_meal(id) => Err(InvalidUpdate::UnknownMeal(id.clone())),
        Toggle::Posture(id) if !catalog::is_posture(id) => {
            Err(InvalidUpdate::UnknownPosture(id.clone()))
        }
        Toggle::Exercise(index) => {
            let len = catalog::workout_plan(date.weekday()).exercises.len();
            if *index as usize >= len {
                return Err(InvalidUpdate::ExerciseOutOfPlan { index: *index, len });
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn validate(date: NaiveDate, update: &EntryUpdate) -> Result<(), InvalidUpdate> {
    if let Some(meals) = &update.meals {
        if let Some(id) = meals.keys().find(|id| !catalog::is_meal(id)) {
            return Err(InvalidUpdate::UnknownMeal(id.clone()));
        }
    }
    if let Some(posture) = &update.posture {
        if let Some(id) = posture.keys().find(|id| !catalog::is_posture(id)) {
            return Err(InvalidUpdate::UnknownPosture(id.clone()));
        }
    }
    if let Some(exercises) = &update.exercises {
        let len = catalog::workout_plan(date.weekday()).exercises.len();
        if let Some(index) = exercises.keys().find(|index| **index as usize >= len) {
            return Err(InvalidUpdate::ExerciseOutOfPlan { index: *index, len });
        }
    }
    Ok(())
}
