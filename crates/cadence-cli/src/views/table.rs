use cadence_core::models::Occurrence;
use cadence_core::validation::FieldError;
use chrono::{Datelike, NaiveDateTime};
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};

/// Renders occurrences as a numbered table, relative to `now`.
pub fn occurrences_table(
    occurrences: &[Occurrence],
    date_format: &str,
    now: NaiveDateTime,
) -> Table {
    let mut table = Table::new();
    table
        .set_header(vec!["#", "Date", "Day", "When"])
        .load_preset(comfy_table::presets::UTF8_FULL);

    for occurrence in occurrences {
        let mut row = Row::new();
        row.add_cell(Cell::new(occurrence.index + 1));

        let mut date_cell = Cell::new(occurrence.at.format(date_format).to_string());
        let mut when_cell = Cell::new((occurrence.at - now).humanize());

        if occurrence.at < now {
            date_cell = date_cell.fg(Color::DarkGrey);
            when_cell = when_cell.fg(Color::DarkGrey);
        } else if occurrence.date() == now.date() {
            date_cell = date_cell.fg(Color::Yellow).add_attribute(Attribute::Bold);
            when_cell = when_cell.fg(Color::Yellow);
        }

        row.add_cell(date_cell);
        row.add_cell(Cell::new(occurrence.at.weekday().to_string()));
        row.add_cell(when_cell);
        table.add_row(row);
    }

    table
}

pub fn display_occurrences(occurrences: &[Occurrence], date_format: &str, now: NaiveDateTime) {
    if occurrences.is_empty() {
        println!("No occurrences.");
        return;
    }
    println!("{}", occurrences_table(occurrences, date_format, now));
}

pub fn field_errors_table(errors: &[FieldError]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Problem"]);
    for error in errors {
        table.add_row(vec![
            Cell::new(&error.field).fg(Color::Red),
            Cell::new(&error.message),
        ]);
    }
    table
}
