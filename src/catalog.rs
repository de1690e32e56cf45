use crate::errors::LedgerError;
use crate::models::{Achievement, Category, HabitTemplate, IconKey, NewCategory, NewHabit};
use chrono::NaiveTime;
use tracing::info;

pub const DEFAULT_COLOR: &str = "#3B82F6";

pub fn default_categories() -> Vec<Category> {
    [
        ("1", "Health", "#3B82F6", IconKey::Heart),
        ("2", "Fitness", "#10B981", IconKey::Dumbbell),
        ("3", "Productivity", "#F59E0B", IconKey::BarChart),
        ("4", "Digital Wellbeing", "#EF4444", IconKey::Laptop),
        ("5", "Learning", "#8B5CF6", IconKey::BookOpen),
    ]
    .into_iter()
    .map(|(id, name, color, icon)| Category {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
        icon,
    })
    .collect()
}

pub fn templates() -> Vec<HabitTemplate> {
    vec![
        HabitTemplate {
            id: "template-1".to_string(),
            name: "Meditation".to_string(),
            goal: 15,
            unit: "minutes".to_string(),
            category: "Health".to_string(),
            notes: "Daily mindfulness practice".to_string(),
            reminder_time: NaiveTime::from_hms_opt(7, 0, 0),
        },
        HabitTemplate {
            id: "template-2".to_string(),
            name: "Reading".to_string(),
            goal: 30,
            unit: "minutes".to_string(),
            category: "Learning".to_string(),
            notes: "Read educational material".to_string(),
            reminder_time: NaiveTime::from_hms_opt(20, 0, 0),
        },
    ]
}

pub fn find_template(id: &str) -> Option<HabitTemplate> {
    templates().into_iter().find(|template| template.id == id)
}

pub fn achievements() -> Vec<Achievement> {
    [
        ("1", "Early Bird", "Complete morning habits for 7 days straight", "🌅"),
        ("2", "Consistency King", "Maintain a 30-day streak", "👑"),
        ("3", "Goal Crusher", "Achieve all daily goals for a week", "💪"),
        ("4", "Category Master", "Complete all habits in a category for a month", "🏆"),
        ("5", "Social Butterfly", "Share 5 habits with friends", "🦋"),
    ]
    .into_iter()
    .map(|(id, name, description, icon)| Achievement {
        id,
        name,
        description,
        icon,
        unlocked: false,
    })
    .collect()
}

/// Starter habits for a fresh dashboard.
pub fn demo_habits() -> Vec<NewHabit> {
    [
        ("Water Intake", 8, "glasses", "Health", "Stay hydrated throughout the day", Some((9, 0))),
        ("Sleep", 8, "hours", "Health", "Get quality sleep", Some((22, 0))),
        ("Exercise", 30, "minutes", "Fitness", "Daily workout routine", Some((18, 0))),
        ("Screen Time", 4, "hours", "Digital Wellbeing", "Limit screen time for better health", None),
    ]
    .into_iter()
    .map(|(name, goal, unit, category, notes, reminder)| NewHabit {
        name: name.to_string(),
        goal: Some(goal),
        unit: unit.to_string(),
        category: Some(category.to_string()),
        notes: Some(notes.to_string()),
        reminder_time: reminder.and_then(|(hour, minute)| NaiveTime::from_hms_opt(hour, minute, 0)),
    })
    .collect()
}

/// Category set edited by the dashboard. Habits refer to categories by name
/// and are left alone when a category goes away.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
    next_id: u64,
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::new(default_categories())
    }
}

impl CategoryRegistry {
    pub fn new(categories: Vec<Category>) -> Self {
        let next_id = categories
            .iter()
            .filter_map(|category| category.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self { categories, next_id }
    }

    pub fn list(&self) -> &[Category] {
        &self.categories
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.categories.iter().any(|category| category.name == name)
    }

    pub fn add(&mut self, spec: NewCategory) -> Result<Category, LedgerError> {
        let name = spec.name.trim();
        if name.is_empty() {
            return Err(LedgerError::MissingCategoryName);
        }

        let category = Category {
            id: self.next_id.to_string(),
            name: name.to_string(),
            color: spec
                .color
                .filter(|color| !color.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            icon: spec.icon.unwrap_or(IconKey::Heart),
        };
        self.next_id += 1;

        info!(category = %category.id, name = %category.name, "category added");
        self.categories.push(category.clone());
        Ok(category)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.categories.len();
        self.categories.retain(|category| category.id != id);
        self.categories.len() != before
    }
}
