use crate::catalog::CategoryRegistry;
use crate::ledger::Ledger;
use crate::models::{Habit, IconKey};
use crate::stats::build_stats;
use std::fmt::Write;

pub fn render_index(ledger: &Ledger, categories: &CategoryRegistry) -> String {
    let today = ledger.today();
    let stats = build_stats(ledger);

    INDEX_HTML
        .replace("{{DATE}}", &today.format("%A, %B %-d").to_string())
        .replace("{{DONE}}", &stats.completed_today.to_string())
        .replace("{{TOTAL}}", &stats.total_habits.to_string())
        .replace("{{BEST}}", &stats.longest_streak.to_string())
        .replace("{{ACTIVE}}", &habit_cards(ledger.active(), categories))
        .replace("{{COMPLETED}}", &habit_cards(ledger.completed(), categories))
        .replace("{{WEEK}}", &week_strip(ledger, today))
        .replace("{{CATEGORIES}}", &category_list(ledger, categories))
}

fn habit_cards<'a>(habits: impl Iterator<Item = &'a Habit>, categories: &CategoryRegistry) -> String {
    let mut html = String::new();
    for habit in habits {
        let icon = categories
            .list()
            .iter()
            .find(|category| category.name == habit.category)
            .map(|category| icon_glyph(category.icon))
            .unwrap_or("•");
        let tier = habit.tier();
        let id = escape(habit.id.as_str());
        let _ = write!(
            html,
            r#"<article class="habit">
  <header><span class="icon">{icon}</span><h3>{name}</h3><span class="streak">🔥 {streak}</span></header>
  <p class="meta">{current} / {goal} {unit} · {category}</p>
  <div class="bar"><div style="width: {percent}%"></div></div>
  <p class="tier">{message}</p>
  <div class="controls">
    <form method="post" action="/habits/{id}/decrement"><button class="minus">−</button></form>
    <form method="post" action="/habits/{id}/increment"><button class="plus">+</button></form>
  </div>
</article>
"#,
            name = escape(&habit.name),
            streak = habit.streak,
            current = habit.current,
            goal = habit.goal,
            unit = escape(&habit.unit),
            category = escape(&habit.category),
            percent = habit.progress_percent().min(100),
            message = tier.message(),
        );
    }
    if html.is_empty() {
        html.push_str(r#"<p class="empty">Nothing here yet.</p>"#);
    }
    html
}

fn week_strip(ledger: &Ledger, today: chrono::NaiveDate) -> String {
    let mut html = String::new();
    for day in ledger.streak_calendar_window(today) {
        let class = match (day.all_habits_completed, day.date == today) {
            (true, true) => "day done today",
            (true, false) => "day done",
            (false, true) => "day today",
            (false, false) => "day",
        };
        let _ = write!(
            html,
            r#"<li class="{class}"><span>{weekday}</span><strong>{day}</strong></li>"#,
            weekday = day.date.format("%a"),
            day = day.date.format("%-d"),
        );
    }
    html
}

fn category_list(ledger: &Ledger, categories: &CategoryRegistry) -> String {
    let breakdown = ledger.category_breakdown();
    let mut html = String::new();
    for category in categories.list() {
        let count = breakdown.get(&category.name).copied().unwrap_or(0);
        let _ = write!(
            html,
            r#"<li><span class="swatch" style="background: {color}"></span>{icon} {name} <em>{count}</em></li>"#,
            color = escape(&category.color),
            icon = icon_glyph(category.icon),
            name = escape(&category.name),
        );
    }
    html
}

fn icon_glyph(icon: IconKey) -> &'static str {
    match icon {
        IconKey::Heart => "❤️",
        IconKey::Dumbbell => "🏋️",
        IconKey::BarChart => "📊",
        IconKey::Laptop => "💻",
        IconKey::BookOpen => "📖",
        IconKey::Brain => "🧠",
        IconKey::Sun => "☀️",
        IconKey::Moon => "🌙",
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Tracker</title>
  <style>
    :root {
      --bg: #f4f6fb;
      --ink: #1f2937;
      --muted: #6b7280;
      --card: #ffffff;
      --accent: #10b981;
      --accent-2: #3b82f6;
      --shadow: 0 18px 40px rgba(31, 41, 55, 0.12);
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      padding: 32px 18px 48px;
    }

    main {
      width: min(960px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 28px;
    }

    h1 { margin: 0; font-size: clamp(1.8rem, 4vw, 2.4rem); }
    h2 { margin: 0 0 12px; font-size: 1.1rem; color: var(--muted); text-transform: uppercase; letter-spacing: 0.1em; }
    h3 { margin: 0; font-size: 1.1rem; flex: 1; }

    .summary {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 16px;
    }

    .summary div, .habit, .panel {
      background: var(--card);
      border-radius: 18px;
      box-shadow: var(--shadow);
      padding: 18px;
    }

    .summary strong { display: block; font-size: 1.8rem; color: var(--accent-2); }
    .summary span { color: var(--muted); font-size: 0.85rem; }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(260px, 1fr));
      gap: 16px;
    }

    .habit header { display: flex; align-items: center; gap: 10px; }
    .habit .meta, .habit .tier { color: var(--muted); margin: 8px 0; }
    .streak { font-weight: 600; }

    .bar { height: 10px; border-radius: 999px; background: #e5e7eb; overflow: hidden; }
    .bar div { height: 100%; background: var(--accent); }

    .controls { display: flex; gap: 10px; justify-content: flex-end; }
    .controls form { margin: 0; }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      width: 44px;
      height: 44px;
      font-size: 1.3rem;
      cursor: pointer;
      color: white;
    }

    .plus { background: var(--accent); }
    .minus { background: #ef4444; }

    .week { list-style: none; display: flex; gap: 8px; padding: 0; margin: 0; }
    .day { flex: 1; text-align: center; padding: 10px 0; border-radius: 12px; background: #e5e7eb; }
    .day span { display: block; font-size: 0.75rem; color: var(--muted); }
    .day.done { background: var(--accent); color: white; }
    .day.done span { color: white; }
    .day.today { outline: 2px solid var(--accent-2); }

    .categories { list-style: none; padding: 0; margin: 0; display: grid; gap: 8px; }
    .swatch { display: inline-block; width: 12px; height: 12px; border-radius: 4px; margin-right: 8px; }
    .categories em { color: var(--muted); font-style: normal; float: right; }

    .empty { color: var(--muted); }
  </style>
</head>
<body>
  <main>
    <header>
      <h1>Habit Tracker</h1>
      <p>{{DATE}}</p>
    </header>

    <section class="summary">
      <div><strong id="done">{{DONE}}</strong><span>completed today</span></div>
      <div><strong id="total">{{TOTAL}}</strong><span>habits</span></div>
      <div><strong id="best">{{BEST}}</strong><span>best streak</span></div>
    </section>

    <section>
      <h2>In progress</h2>
      <div class="grid">{{ACTIVE}}</div>
    </section>

    <section>
      <h2>Completed</h2>
      <div class="grid">{{COMPLETED}}</div>
    </section>

    <section class="panel">
      <h2>This week</h2>
      <ul class="week">{{WEEK}}</ul>
    </section>

    <section class="panel">
      <h2>Categories</h2>
      <ul class="categories">{{CATEGORIES}}</ul>
    </section>
  </main>
</body>
</html>
"#;
