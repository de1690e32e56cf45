use crate::models::HabitId;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

pub const WINDOW_DAYS: usize = 7;

/// One day's recorded value per habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyLog {
    pub date: NaiveDate,
    pub habits: BTreeMap<HabitId, u32>,
}

/// Per-day values for the most recent dates, at most one entry per date.
///
/// When a new date pushes the window past its capacity the oldest date is
/// dropped.
#[derive(Debug, Clone)]
pub struct RollingLog {
    days: BTreeMap<NaiveDate, BTreeMap<HabitId, u32>>,
    capacity: usize,
}

impl Default for RollingLog {
    fn default() -> Self {
        Self::with_capacity(WINDOW_DAYS)
    }
}

impl RollingLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            days: BTreeMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Records `value` for `habit` on `date`, overwriting any earlier value.
    pub fn upsert(&mut self, date: NaiveDate, habit: &HabitId, value: u32) {
        self.days.entry(date).or_default().insert(habit.clone(), value);
        self.evict();
    }

    /// Like `upsert` but keeps an existing value for that day.
    pub fn seed(&mut self, date: NaiveDate, habit: &HabitId) {
        self.days
            .entry(date)
            .or_default()
            .entry(habit.clone())
            .or_insert(0);
        self.evict();
    }

    /// Drops `habit` from every day. Days stay even if left empty.
    pub fn prune_habit(&mut self, habit: &HabitId) {
        for values in self.days.values_mut() {
            values.remove(habit);
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&BTreeMap<HabitId, u32>> {
        self.days.get(&date)
    }

    pub fn value(&self, date: NaiveDate, habit: &HabitId) -> Option<u32> {
        self.days.get(&date).and_then(|values| values.get(habit).copied())
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Oldest first.
    pub fn entries(&self) -> Vec<DailyLog> {
        self.days
            .iter()
            .map(|(date, habits)| DailyLog {
                date: *date,
                habits: habits.clone(),
            })
            .collect()
    }

    fn evict(&mut self) {
        while self.days.len() > self.capacity {
            self.days.pop_first();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap() + Duration::days(n)
    }

    #[test]
    fn eighth_date_evicts_oldest() {
        let mut log = RollingLog::default();
        let id = HabitId::from("water");
        for n in 0..8 {
            log.upsert(day(n), &id, n as u32);
        }

        assert_eq!(log.len(), 7);
        assert!(log.get(day(0)).is_none());
        assert_eq!(log.entries().first().map(|entry| entry.date), Some(day(1)));
        assert_eq!(log.value(day(7), &id), Some(7));
    }

    #[test]
    fn upsert_same_date_keeps_one_entry() {
        let mut log = RollingLog::default();
        let water = HabitId::from("water");
        let sleep = HabitId::from("sleep");
        log.upsert(day(0), &water, 1);
        log.upsert(day(0), &water, 3);
        log.upsert(day(0), &sleep, 8);

        assert_eq!(log.len(), 1);
        assert_eq!(log.value(day(0), &water), Some(3));
        assert_eq!(log.value(day(0), &sleep), Some(8));
    }

    #[test]
    fn seed_does_not_clobber_recorded_value() {
        let mut log = RollingLog::default();
        let id = HabitId::from("water");
        log.upsert(day(0), &id, 4);
        log.seed(day(0), &id);
        assert_eq!(log.value(day(0), &id), Some(4));

        let other = HabitId::from("sleep");
        log.seed(day(0), &other);
        assert_eq!(log.value(day(0), &other), Some(0));
    }

    #[test]
    fn prune_removes_habit_from_every_day() {
        let mut log = RollingLog::default();
        let water = HabitId::from("water");
        let sleep = HabitId::from("sleep");
        for n in 0..3 {
            log.upsert(day(n), &water, 2);
            log.upsert(day(n), &sleep, 6);
        }

        log.prune_habit(&water);
        log.prune_habit(&water);

        assert_eq!(log.len(), 3);
        for entry in log.entries() {
            assert!(!entry.habits.contains_key(&water));
            assert_eq!(entry.habits.get(&sleep), Some(&6));
        }
    }
}
