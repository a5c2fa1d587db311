//! Terminal rendering of schedules

use anyhow::Result;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::core::schedule::Schedule;
use crate::core::set::set_name;

#[derive(Tabled)]
struct AgendaLine {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "New Words")]
    new_words: String,
    #[tabled(rename = "Reviews")]
    reviews: String,
}

#[derive(Tabled)]
struct RowLine {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Set")]
    set: String,
    #[tabled(rename = "Event")]
    event: String,
}

/// One line per date: `Date | New Words | Reviews`
pub fn agenda_table(schedule: &Schedule) -> String {
    let lines = schedule.daily_agenda().into_iter().map(|day| AgendaLine {
        date: day.date_label(),
        new_words: day.learn_label(),
        reviews: day.reviews_label(),
    });

    Table::new(lines).with(Style::psql()).to_string()
}

/// One line per event: `Date | Set | Event`
pub fn rows_table(schedule: &Schedule) -> String {
    let lines = schedule.to_rows().map(|row| RowLine {
        date: row.date.format("%Y-%m-%d").to_string(),
        set: set_name(row.set_number),
        event: row.label(),
    });

    Table::new(lines).with(Style::psql()).to_string()
}

/// Flat JSON view of the schedule rows
pub fn rows_json(schedule: &Schedule) -> Result<String> {
    let rows: Vec<serde_json::Value> = schedule
        .to_rows()
        .map(|row| {
            serde_json::json!({
                "date": row.date,
                "set": row.set_number,
                "event": row.event.short_label(),
                "action": row.action(),
            })
        })
        .collect();

    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "sets": schedule.len(),
        "rows": rows,
    }))?)
}
