use crate::models::{Habit, HabitId};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Receives a habit the first time it is completed on a given day.
pub trait NotificationSink: Send + Sync {
    fn habit_completed(&self, habit: &Habit);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionEvent {
    pub habit_id: HabitId,
    pub habit_name: String,
    pub message: String,
    pub at: NaiveDateTime,
}

impl CompletionEvent {
    pub fn for_habit(habit: &Habit) -> Self {
        Self {
            habit_id: habit.id.clone(),
            habit_name: habit.name.clone(),
            message: format!("Great job completing {}!", habit.name),
            at: habit.last_updated,
        }
    }
}

/// Pending completion toasts, drained by the dashboard.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    pending: Arc<Mutex<VecDeque<CompletionEvent>>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<CompletionEvent> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<CompletionEvent>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl NotificationSink for ToastQueue {
    fn habit_completed(&self, habit: &Habit) {
        info!(habit = %habit.id, name = %habit.name, streak = habit.streak, "habit completed");
        self.lock().push_back(CompletionEvent::for_habit(habit));
    }
}
