use crate::catalog::{MEALS, POSTURE};
use crate::models::{SummaryResponse, TodayResponse};
use crate::timer::DEFAULT_REST_SECS;
use std::fmt::Write;

pub fn render_index(summary: &SummaryResponse, today: &TodayResponse) -> String {
    let entry = &today.entry;
    let verdict = match entry.daily_xp {
        xp if xp >= 10 => "Pattern Verified",
        0 => "No Record",
        _ => "Partial Entry",
    };

    INDEX_HTML
        .replace("{{SEASON}}", &summary.time.season.to_string())
        .replace("{{CHAPTER}}", &summary.time.chapter.to_string())
        .replace("{{DAY_IN_CHAPTER}}", &summary.time.day_in_chapter.to_string())
        .replace("{{TOTAL_DAYS}}", &summary.time.total_days.to_string())
        .replace("{{DAILY_XP}}", &entry.daily_xp.to_string())
        .replace("{{VERDICT}}", verdict)
        .replace("{{STREAK}}", &summary.streak.to_string())
        .replace("{{STRIP}}", &render_strip(summary))
        .replace("{{WEEKDAY}}", &today.weekday)
        .replace("{{MUSCLE}}", today.plan.muscle)
        .replace("{{IMPACT}}", if today.plan.high_impact { IMPACT_BANNER } else { "" })
        .replace("{{EXERCISES}}", &render_exercises(today))
        .replace("{{WORKOUT_LABEL}}", if entry.workout_done { "Session Logged" } else { "Log Completion" })
        .replace("{{WORKOUT_CLASS}}", done_class(entry.workout_done))
        .replace("{{REST_SECS}}", &DEFAULT_REST_SECS.to_string())
        .replace("{{MEALS}}", &render_checklist("meal", MEALS, &entry.meals))
        .replace("{{POSTURE}}", &render_checklist("posture", POSTURE, &entry.posture))
        .replace("{{SLEEP_LABEL}}", if entry.sleep_planned { "Recovery Logged" } else { "Log Sleep Intent" })
        .replace("{{SLEEP_CLASS}}", done_class(entry.sleep_planned))
        .replace("{{RANK_NUMERAL}}", summary.rank.numeral)
        .replace("{{RANK_NAME}}", summary.rank.name)
        .replace("{{RANK_SUBTITLE}}", summary.rank.subtitle)
        .replace("{{RANK_TOOLTIP}}", summary.rank.tooltip)
        .replace("{{RANK_COLOR}}", summary.rank.color)
        .replace("{{RANK_SHAPE}}", summary.rank.shape)
        .replace("{{PROGRESS}}", &render_progress(summary))
        .replace("{{TODAY}}", &summary.today)
        // External text goes in last so it is never scanned for placeholders.
        .replace("{{INSIGHT}}", &escape(&summary.insight))
}

fn render_strip(summary: &SummaryResponse) -> String {
    let mut out = String::new();
    for day in &summary.last_7_days {
        let level = match day.xp {
            xp if xp >= 10 => "full",
            0 => "none",
            _ => "half",
        };
        let _ = write!(out, r#"<div class="bar {level}" title="{} · {} XP"></div>"#, day.date, day.xp);
    }
    out
}

fn render_exercises(today: &TodayResponse) -> String {
    let mut out = String::new();
    for (idx, name) in today.plan.exercises.iter().enumerate() {
        let done = today.entry.workout_done
            || today.entry.exercises.get(&(idx as u32)).copied().unwrap_or(false);
        let _ = write!(
            out,
            r#"<form method="post" action="/toggle/exercise/{idx}"><button class="item {}">{}</button></form>"#,
            done_class(done),
            escape(name)
        );
    }
    out
}

fn render_checklist(
    target: &str,
    items: &[crate::catalog::ChecklistItem],
    flags: &std::collections::BTreeMap<String, bool>,
) -> String {
    let mut out = String::new();
    for item in items {
        let done = flags.get(item.id).copied().unwrap_or(false);
        let _ = write!(
            out,
            r#"<form method="post" action="/toggle/{target}/{}"><button class="item {}"><strong>{}</strong><small>{}</small></button></form>"#,
            item.id,
            done_class(done),
            escape(item.label),
            escape(item.detail)
        );
    }
    out
}

fn render_progress(summary: &SummaryResponse) -> String {
    match (summary.next_rank, summary.progress_percent) {
        (Some(next), Some(percent)) => format!(
            r#"<div class="track"><div class="fill" style="width:{percent:.1}%"></div></div><div class="row"><span>{} XP</span><span>Next Rank: {}</span></div>"#,
            summary.total_xp, next.min_xp
        ),
        _ => format!(r#"<div class="row"><span>{} XP</span><span>Final tier reached</span></div>"#, summary.total_xp),
    }
}

fn done_class(done: bool) -> &'static str {
    if done { "done" } else { "" }
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

const IMPACT_BANNER: &str = r#"<div class="impact"><strong>High Impact Session</strong><small>Joint loading and high CNS output expected.</small></div>"#;

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Obsidian · Discipline System</title>
  <style>
    :root {
      --bg: #050505;
      --card: rgba(255, 255, 255, 0.04);
      --line: rgba(255, 255, 255, 0.08);
      --ink: #f5f5f5;
      --muted: #8a8a8a;
      --rank: {{RANK_COLOR}};
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Helvetica Neue", sans-serif;
    }

    .app {
      max-width: 440px;
      margin: 0 auto;
      min-height: 100vh;
      border-left: 1px solid var(--line);
      border-right: 1px solid var(--line);
      padding: 24px 20px 96px;
    }

    header {
      display: flex;
      justify-content: space-between;
      align-items: center;
      margin-bottom: 24px;
    }

    h1 {
      margin: 0;
      font-size: 1.2rem;
      letter-spacing: 0.02em;
      text-transform: uppercase;
    }

    h2 {
      font-size: 0.7rem;
      letter-spacing: 0.3em;
      text-transform: uppercase;
      color: var(--muted);
      margin: 32px 0 12px;
    }

    .pill {
      padding: 4px 12px;
      border: 1px solid var(--line);
      border-radius: 999px;
      font-size: 0.65rem;
      color: var(--muted);
    }

    .score {
      font-size: 5rem;
      font-weight: 200;
      text-align: center;
    }

    .verdict {
      text-align: center;
      font-size: 0.65rem;
      letter-spacing: 0.4em;
      text-transform: uppercase;
      color: var(--rank);
    }

    .card {
      background: var(--card);
      border: 1px solid var(--line);
      border-radius: 20px;
      padding: 18px;
      margin-top: 16px;
    }

    .row {
      display: flex;
      justify-content: space-between;
      font-size: 0.75rem;
      color: var(--muted);
      margin-top: 8px;
    }

    .strip {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 6px;
      height: 64px;
      align-items: end;
    }

    .bar {
      border-radius: 999px;
      background: rgba(255, 255, 255, 0.05);
      height: 8px;
    }

    .bar.half {
      background: rgba(255, 255, 255, 0.2);
      height: 50%;
    }

    .bar.full {
      background: var(--rank);
      height: 100%;
    }

    form {
      margin: 0;
    }

    .item {
      width: 100%;
      display: flex;
      flex-direction: column;
      align-items: flex-start;
      gap: 2px;
      text-align: left;
      padding: 14px 16px;
      margin-bottom: 8px;
      border-radius: 14px;
      border: 1px solid var(--line);
      background: var(--card);
      color: var(--ink);
      font: inherit;
      cursor: pointer;
    }

    .item small {
      color: var(--muted);
    }

    .item.done {
      border-color: var(--rank);
      background: rgba(255, 255, 255, 0.08);
    }

    .impact {
      display: grid;
      gap: 4px;
      text-align: center;
      padding: 12px;
      margin-bottom: 12px;
      border-radius: 14px;
      border: 1px solid rgba(245, 158, 11, 0.3);
      color: #f59e0b;
      font-size: 0.75rem;
    }

    .timer {
      display: flex;
      justify-content: space-between;
      align-items: center;
      font-family: "JetBrains Mono", monospace;
      font-size: 1.8rem;
    }

    .timer button,
    .actions button,
    .actions label {
      font: inherit;
      font-size: 0.7rem;
      text-transform: uppercase;
      padding: 6px 12px;
      border-radius: 8px;
      border: 1px solid var(--line);
      background: var(--card);
      color: var(--ink);
      cursor: pointer;
    }

    .rank {
      text-align: center;
      padding: 24px 0;
    }

    .emblem {
      width: 120px;
      height: 120px;
      margin: 0 auto 20px;
      background: var(--rank);
    }

    .emblem.circle { border-radius: 50%; }
    .emblem.hexagon { clip-path: polygon(50% 0, 93% 25%, 93% 75%, 50% 100%, 7% 75%, 7% 25%); }
    .emblem.diamond { clip-path: polygon(50% 0, 100% 50%, 50% 100%, 0 50%); }
    .emblem.crest { clip-path: polygon(50% 0, 100% 25%, 80% 100%, 20% 100%, 0 25%); }
    .emblem.star { clip-path: polygon(50% 0, 60% 40%, 100% 40%, 70% 60%, 80% 100%, 50% 80%, 20% 100%, 30% 60%, 0 40%, 40% 40%); }
    .emblem.crown { clip-path: polygon(0 20%, 20% 50%, 50% 0, 80% 50%, 100% 20%, 85% 100%, 15% 100%); }

    .track {
      height: 6px;
      border-radius: 999px;
      background: var(--line);
      overflow: hidden;
    }

    .fill {
      height: 100%;
      background: var(--rank);
    }

    .actions {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
      margin-top: 16px;
    }

    .actions input {
      display: none;
    }

    nav {
      position: fixed;
      bottom: 0;
      left: 50%;
      transform: translateX(-50%);
      width: min(440px, 100%);
      display: flex;
      justify-content: space-around;
      padding: 14px 0;
      background: rgba(5, 5, 5, 0.9);
      border-top: 1px solid var(--line);
    }

    nav a {
      color: var(--muted);
      text-decoration: none;
      font-size: 0.7rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <div>
        <h1>Obsidian</h1>
        <div class="pill">Discipline System</div>
      </div>
      <div class="pill" title="Day {{DAY_IN_CHAPTER}} of chapter · {{TOTAL_DAYS}} days total">S{{SEASON}} : CH {{CHAPTER}}</div>
    </header>

    <section id="log">
      <div class="score">{{DAILY_XP}}</div>
      <div class="verdict">{{VERDICT}}</div>
      <div class="card">
        <div class="row"><span>Streak</span><span>{{STREAK}} days</span></div>
        <p>"{{INSIGHT}}"</p>
      </div>
      <div class="card strip">{{STRIP}}</div>
    </section>

    <section id="train">
      <h2>Training Focus: {{MUSCLE}} · {{WEEKDAY}}</h2>
      <div class="card timer">
        <span id="timer">00:00</span>
        <span>
          <button type="button" data-rest="{{REST_SECS}}">{{REST_SECS}}s</button>
          <button type="button" data-rest="0">Reset</button>
        </span>
      </div>
      {{IMPACT}}
      {{EXERCISES}}
      <form method="post" action="/toggle/workout"><button class="item {{WORKOUT_CLASS}}">{{WORKOUT_LABEL}}</button></form>
    </section>

    <section id="fuel">
      <h2>Fuel</h2>
      {{MEALS}}
    </section>

    <section id="align">
      <h2>Alignment</h2>
      {{POSTURE}}
      <form method="post" action="/toggle/sleep"><button class="item {{SLEEP_CLASS}}">{{SLEEP_LABEL}}</button></form>
    </section>

    <section id="standing" class="rank">
      <h2>Standing</h2>
      <div class="emblem {{RANK_SHAPE}}" title="{{RANK_TOOLTIP}}"></div>
      <div class="verdict">{{RANK_NUMERAL}} · {{RANK_NAME}}</div>
      <p>{{RANK_SUBTITLE}}</p>
      {{PROGRESS}}
      <div class="actions">
        <a href="/api/export" download="obsidian_backup_{{TODAY}}.json"><button type="button">Export</button></a>
        <label>Import<input id="import" type="file" accept="application/json" /></label>
        <button type="button" id="reset">Reset</button>
      </div>
    </section>
  </main>

  <nav>
    <a href="#log">Log</a>
    <a href="#train">Train</a>
    <a href="#fuel">Fuel</a>
    <a href="#align">Align</a>
    <a href="#standing">Standing</a>
  </nav>

  <script>
    const timerEl = document.getElementById("timer");
    let remaining = 0;

    function paint() {
      const m = String(Math.floor(remaining / 60)).padStart(2, "0");
      const s = String(remaining % 60).padStart(2, "0");
      timerEl.textContent = `${m}:${s}`;
    }

    async function syncTimer(method, body) {
      const res = await fetch("/api/timer", {
        method,
        headers: { "Content-Type": "application/json" },
        body: body ? JSON.stringify(body) : undefined,
      });
      if (res.ok) {
        remaining = (await res.json()).remaining;
        paint();
      }
    }

    document.querySelectorAll("[data-rest]").forEach((btn) => {
      btn.addEventListener("click", () => {
        const seconds = Number(btn.dataset.rest);
        syncTimer(seconds > 0 ? "POST" : "DELETE", seconds > 0 ? { seconds } : null);
      });
    });

    setInterval(() => {
      if (remaining > 0) {
        remaining -= 1;
        paint();
      }
    }, 1000);
    syncTimer("GET");

    document.getElementById("import").addEventListener("change", async (event) => {
      const file = event.target.files[0];
      if (!file) return;
      const res = await fetch("/api/import", { method: "POST", body: await file.text() });
      if (!res.ok) {
        alert("Invalid data format.");
        return;
      }
      window.location.reload();
    });

    document.getElementById("reset").addEventListener("click", async () => {
      if (!window.confirm("Total system reset? All infrastructure will be purged.")) return;
      await fetch("/api/reset", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({ confirm: true }),
      });
      window.location.reload();
    });
  </script>
</body>
</html>
"##;
