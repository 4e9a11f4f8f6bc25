//! Plain-text rendering of a [`ViewState`].

use std::fmt;

use skyview_core::{
    MapMode, ViewState,
    presentation::{detail_rows, headline, temperature},
};

/// Error banner, results panel and map panel, in that order. Empty parts are skipped.
pub struct View<'a>(pub &'a ViewState);

impl fmt::Display for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;

        if let Some(err) = state.error() {
            writeln!(f, "\n  ! {}", err.user_message())?;
            if err.is_retryable() {
                writeln!(f, "    Check the city name or your connection and try again.")?;
            }
        }

        if let Some(record) = state.weather() {
            writeln!(f, "\n  {}", headline(record))?;
            writeln!(f, "  {}  {}", temperature(record), record.description)?;
            writeln!(f)?;

            let rows = detail_rows(record);
            let width = rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
            for row in rows {
                writeln!(f, "  {:<width$}  {}", row.label, row.value)?;
            }
        }

        if let Some(map) = state.map() {
            let label = match map.mode {
                MapMode::CoordinateCentered => "Map",
                MapMode::NameSearch => "Map (search)",
            };
            writeln!(f, "\n  {label}: {}", map.url)?;
        }

        Ok(())
    }
}
