//! Scripted, headless walk through a date picker session.
//!
//! Run with `RUST_LOG=tessera_date_picker=debug` to watch the state
//! transitions.
use std::{error::Error, sync::Arc};

use tessera_date_picker::{
    Callback, CalendarDate, DatePicker, DatePickerArgs, DatePickerKey, FieldState, Weekday,
};
use tracing::{info, warn};

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new("error,tessera_date_picker=debug") {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("error"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .try_init();
}

fn print_grid(picker: &DatePicker) {
    println!("{:^34}", picker.month_year_label());
    println!(
        "{}",
        picker
            .weekday_labels()
            .map(|label| format!("{label:>4}"))
            .concat()
    );
    for week in picker.day_cells().chunks(7) {
        let row: String = week
            .iter()
            .map(|cell| {
                let marker = match (cell.is_selected, cell.is_focused, cell.is_selectable) {
                    (true, _, _) => '*',
                    (_, true, _) => '>',
                    (_, _, false) => 'x',
                    _ if cell.is_out_of_month => '.',
                    _ => ' ',
                };
                format!("{marker}{:>3}", cell.date.day())
            })
            .collect();
        println!("{row}");
    }
    println!();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let start = CalendarDate::new(2024, 1, 15).ok_or("invalid start date")?;
    let mut picker = DatePicker::new(
        DatePickerArgs::default()
            .initial_selected_date(start)
            .first_day_of_week(Weekday::Sunday)
            .selectable_dates(Arc::new(|date: CalendarDate| {
                !matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
            }))
            .on_field_value_change(Callback::new(|text: String| info!(%text, "field changed")))
            .on_expanded_change(Callback::new(|open: bool| info!(open, "popup toggled")))
            .on_validation_result(Callback::new(|valid: bool| info!(valid, "validated"))),
    );

    picker.on_field_click();
    print_grid(&picker);

    for key in [DatePickerKey::ArrowDown, DatePickerKey::ArrowDown, DatePickerKey::ArrowDown] {
        picker.on_calendar_key(key);
        let grid = picker.matrix();
        picker.on_layout(&grid);
    }
    print_grid(&picker);
    picker.on_calendar_key(DatePickerKey::Enter);
    info!(headline = %picker.headline(), "picked from keyboard");

    if let Err(err) = picker.on_field_text_change("2024/06/22") {
        warn!(error = %err, "typed date not applied");
    }
    picker.on_field_text_change("2024/06/20")?;
    picker.on_field_key(DatePickerKey::Enter);
    print_grid(&picker);
    picker.on_outside_click();

    picker.set_field_state(FieldState::Disabled);
    if !picker.on_field_click() {
        info!("disabled field stays closed");
    }
    Ok(())
}
