use crate::clock::Clock;
use crate::errors::LedgerError;
use crate::models::{CalendarDay, Habit, HabitId, HabitTemplate, HistoryEntry, NewHabit};
use crate::notify::NotificationSink;
use crate::rolling_log::RollingLog;
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

pub const DEFAULT_CATEGORY: &str = "Health";

#[derive(Debug, Default)]
pub struct UpdateOutcome {
    /// The habit after the update, `None` if the id was unknown.
    pub habit: Option<Habit>,
    /// Habits that completed for the first time today during this update.
    pub moved_to_completed: Vec<Habit>,
}

/// Owns the habits and the rolling log and applies every mutation to them.
pub struct Ledger {
    habits: Vec<Habit>,
    log: RollingLog,
    notified: HashSet<HabitId>,
    current_day: NaiveDate,
    last_id: i64,
    clock: Box<dyn Clock>,
    sink: Box<dyn NotificationSink>,
}

impl Ledger {
    pub fn new(clock: impl Clock + 'static, sink: impl NotificationSink + 'static) -> Self {
        let current_day = clock.today();
        Self {
            habits: Vec::new(),
            log: RollingLog::default(),
            notified: HashSet::new(),
            current_day,
            last_id: 0,
            clock: Box::new(clock),
            sink: Box::new(sink),
        }
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn habit(&self, id: &HabitId) -> Option<&Habit> {
        self.habits.iter().find(|habit| &habit.id == id)
    }

    pub fn active(&self) -> impl Iterator<Item = &Habit> {
        self.habits.iter().filter(|habit| !habit.completed_today)
    }

    pub fn completed(&self) -> impl Iterator<Item = &Habit> {
        self.habits.iter().filter(|habit| habit.completed_today)
    }

    pub fn rolling_log(&self) -> &RollingLog {
        &self.log
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Sets a habit's value for today.
    ///
    /// `raw` is clamped into `0..=goal`. Reaching the goal bumps the streak,
    /// anything short of it resets the streak to zero. Unknown ids are ignored.
    pub fn apply_update(&mut self, id: &HabitId, raw: i64) -> UpdateOutcome {
        self.check_rollover();
        let now = self.clock.now();
        let today = now.date();

        let Some(habit) = self.habits.iter_mut().find(|habit| &habit.id == id) else {
            debug!(habit = %id, "update for unknown habit ignored");
            return UpdateOutcome::default();
        };

        let value = raw.clamp(0, i64::from(habit.goal)) as u32;
        let completed = value >= habit.goal;
        habit.current = value;
        habit.completed_today = completed;
        habit.streak = if completed { habit.streak.saturating_add(1) } else { 0 };
        habit.last_updated = now;
        habit.history.push(HistoryEntry { date: today, value });
        debug!(habit = %id, raw, value, streak = habit.streak, completed, "habit updated");
        let updated = habit.clone();

        self.log.upsert(today, id, value);
        let moved_to_completed = self.notify_completed();

        UpdateOutcome {
            habit: Some(updated),
            moved_to_completed,
        }
    }

    pub fn add_habit(&mut self, spec: NewHabit) -> Result<Habit, LedgerError> {
        let name = spec.name.trim();
        if name.is_empty() {
            return Err(LedgerError::MissingName);
        }
        let unit = spec.unit.trim();
        if unit.is_empty() {
            return Err(LedgerError::MissingUnit);
        }

        self.check_rollover();
        let habit = Habit {
            id: self.next_id(),
            name: name.to_string(),
            goal: spec.goal.filter(|goal| *goal > 0).unwrap_or(1),
            current: 0,
            unit: unit.to_string(),
            streak: 0,
            category: spec
                .category
                .filter(|category| !category.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            notes: spec.notes.unwrap_or_default(),
            reminder_time: spec.reminder_time,
            last_updated: self.clock.now(),
            completed_today: false,
            history: Vec::new(),
            shared: false,
        };

        self.log.seed(self.current_day, &habit.id);
        info!(habit = %habit.id, name = %habit.name, goal = habit.goal, "habit added");
        self.habits.push(habit.clone());
        Ok(habit)
    }

    /// Removes the habit and its values from the rolling log.
    /// Returns whether anything was removed.
    pub fn delete_habit(&mut self, id: &HabitId) -> bool {
        let before = self.habits.len();
        self.habits.retain(|habit| &habit.id != id);
        self.log.prune_habit(id);
        self.notified.remove(id);

        let removed = self.habits.len() != before;
        if removed {
            info!(habit = %id, "habit deleted");
        }
        removed
    }

    pub fn instantiate_from_template(&mut self, template: &HabitTemplate) -> Habit {
        self.check_rollover();
        let habit = Habit {
            id: self.next_id(),
            name: template.name.clone(),
            goal: template.goal.max(1),
            current: 0,
            unit: template.unit.clone(),
            streak: 0,
            category: template.category.clone(),
            notes: template.notes.clone(),
            reminder_time: template.reminder_time,
            last_updated: self.clock.now(),
            completed_today: false,
            history: Vec::new(),
            shared: false,
        };

        info!(habit = %habit.id, template = %template.id, "habit created from template");
        self.habits.push(habit.clone());
        habit
    }

    pub fn share_habit(&mut self, id: &HabitId) -> Option<Habit> {
        let habit = self.habits.iter_mut().find(|habit| &habit.id == id)?;
        habit.shared = true;
        Some(habit.clone())
    }

    /// Runs `day_rollover` if the clock has moved past the day the ledger or
    /// any habit was last touched on.
    pub fn check_rollover(&mut self) -> bool {
        let today = self.clock.today();
        let stale = today != self.current_day
            || self
                .habits
                .iter()
                .any(|habit| habit.last_updated.date() != today);
        if stale {
            self.day_rollover();
        }
        stale
    }

    /// Clears daily progress. Streaks and history are kept.
    pub fn day_rollover(&mut self) {
        let now = self.clock.now();
        for habit in &mut self.habits {
            habit.current = 0;
            habit.completed_today = false;
            habit.last_updated = now;
        }
        self.notified.clear();
        self.current_day = now.date();
        info!(day = %self.current_day, habits = self.habits.len(), "day rollover");
    }

    pub fn category_breakdown(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for habit in &self.habits {
            *counts.entry(habit.category.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Sunday-to-Saturday week around `reference`. A day counts as completed
    /// when every habit has a history row on that date at or above its goal.
    pub fn streak_calendar_window(&self, reference: NaiveDate) -> Vec<CalendarDay> {
        let start = week_start(reference);
        (0..7)
            .map(|offset| {
                let date = start + Duration::days(offset);
                CalendarDay {
                    date,
                    all_habits_completed: self.habits.iter().all(|habit| habit.reached_goal_on(date)),
                }
            })
            .collect()
    }

    fn notify_completed(&mut self) -> Vec<Habit> {
        let mut moved = Vec::new();
        for habit in self.habits.iter().filter(|habit| habit.completed_today) {
            if self.notified.insert(habit.id.clone()) {
                self.sink.habit_completed(habit);
                moved.push(habit.clone());
            }
        }
        moved
    }

    fn next_id(&mut self) -> HabitId {
        let millis = self.clock.now().and_utc().timestamp_millis();
        self.last_id = millis.max(self.last_id + 1);
        HabitId::new(self.last_id.to_string())
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}
