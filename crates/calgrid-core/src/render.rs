use std::io::Write;

use unicode_width::UnicodeWidthStr;

use crate::month::{
  MonthCell,
  MonthGrid
};
use crate::week::{
  HOURS_PER_DAY,
  WeekGrid
};

const ANSI_TODAY: &str = "1;33";
const ANSI_DIM: &str = "2";
const ANSI_WARN: &str = "31";

/// Text front end for computed grids.
#[derive(Debug, Clone)]
pub struct Renderer {
  color: bool
}

impl Renderer {
  #[must_use]
  pub fn new(color: bool) -> Self {
    Self { color }
  }

  #[tracing::instrument(skip_all)]
  pub fn write_month<W: Write>(
    &self,
    out: &mut W,
    grid: &MonthGrid
  ) -> anyhow::Result<()> {
    writeln!(out, "{}", grid.title())?;
    writeln!(out)?;

    let headers = grid
      .weekday_labels
      .iter()
      .map(|label| label.to_string())
      .collect::<Vec<_>>();
    let rows = grid
      .weeks()
      .map(|week| {
        week
          .iter()
          .map(|cell| self.month_cell(cell))
          .collect::<Vec<_>>()
      })
      .collect::<Vec<_>>();
    write_table(&mut *out, &headers, rows)?;

    let busy = grid
      .cells
      .iter()
      .filter(|cell| {
        cell.is_current_month
          && !cell.events.is_empty()
      })
      .collect::<Vec<_>>();
    if !busy.is_empty() {
      writeln!(out)?;
    }
    for cell in busy {
      for entry in &cell.events {
        writeln!(
          out,
          "{}  {:>8}  {}",
          cell.date.format("%a %b %-d"),
          entry.start_label,
          entry.event.title
        )?;
      }
      if cell.has_more {
        writeln!(
          out,
          "{}  + More events ({})",
          cell.date.format("%a %b %-d"),
          cell.hidden_count
        )?;
      }
    }

    self.write_skipped(
      out,
      grid.skipped.iter().map(|s| {
        (s.event.title.as_str(), &s.error)
      })
    )
  }

  #[tracing::instrument(skip_all)]
  pub fn write_week<W: Write>(
    &self,
    out: &mut W,
    grid: &WeekGrid
  ) -> anyhow::Result<()> {
    writeln!(
      out,
      "Week of {} - {}",
      grid.start.format("%b %-d"),
      grid.end.format("%b %-d, %Y")
    )?;
    writeln!(out)?;

    let mut headers =
      vec!["Time".to_string()];
    headers.extend(grid.columns.iter().map(
      |column| {
        if column.is_today {
          self.paint(
            &column.label,
            ANSI_TODAY
          )
        } else {
          column.label.clone()
        }
      }
    ));

    let rows = (0..HOURS_PER_DAY)
      .map(|hour| {
        let mut row = vec![format!(
          "{hour:02}:00"
        )];
        row.extend(grid.columns.iter().map(
          |column| {
            column
              .events
              .iter()
              .filter(|block| {
                block.window.start.hour()
                  == hour
              })
              .map(|block| {
                block.event.title.as_str()
              })
              .collect::<Vec<_>>()
              .join(" | ")
          }
        ));
        row
      })
      .filter(|row| {
        row.iter().skip(1).any(|c| {
          !c.is_empty()
        })
      })
      .collect::<Vec<_>>();

    if rows.is_empty() {
      writeln!(out, "(no events)")?;
    } else {
      write_table(&mut *out, &headers, rows)?;
    }

    writeln!(out)?;
    for column in &grid.columns {
      for block in &column.events {
        writeln!(
          out,
          "{}  {}  top={:.2}rem \
           height={:.2}rem width={:.1}% \
           left={:.1}%",
          column.label,
          block.tooltip,
          block.top,
          block.height,
          block.width,
          block.left
        )?;
      }
    }

    self.write_skipped(
      out,
      grid.skipped.iter().map(|s| {
        (s.event.title.as_str(), &s.error)
      })
    )
  }

  fn write_skipped<'a, W, I, E>(
    &self,
    out: &mut W,
    skipped: I
  ) -> anyhow::Result<()>
  where
    W: Write,
    I: Iterator<Item = (&'a str, &'a E)>,
    E: std::fmt::Display + 'a
  {
    for (title, error) in skipped {
      let line = format!(
        "skipped `{title}`: {error}"
      );
      writeln!(
        out,
        "{}",
        self.paint(&line, ANSI_WARN)
      )?;
    }
    Ok(())
  }

  fn month_cell(
    &self,
    cell: &MonthCell
  ) -> String {
    let mut text =
      cell.date.format("%-d").to_string();
    let total = cell.total_events();
    if cell.has_more {
      text.push_str(&format!(
        " ({}+{})",
        cell.events.len(),
        cell.hidden_count
      ));
    } else if total > 0 {
      text.push_str(&format!(
        " ({total})"
      ));
    }

    if cell.is_today {
      self.paint(&text, ANSI_TODAY)
    } else if !cell.is_current_month {
      self.paint(&text, ANSI_DIM)
    } else {
      text
    }
  }

  fn paint(
    &self,
    text: &str,
    code: &str
  ) -> String {
    if !self.color {
      return text.to_string();
    }
    format!("\x1b[{code}m{text}\x1b[0m")
  }
}

fn write_table<W: Write>(
  mut writer: W,
  headers: &[String],
  rows: Vec<Vec<String>>
) -> anyhow::Result<()> {
  let column_count = headers.len();
  let mut widths =
    vec![0usize; column_count];

  for (idx, header) in
    headers.iter().enumerate()
  {
    widths[idx] = widths[idx].max(
      visible_width(header)
    );
  }

  for row in &rows {
    for (idx, cell) in
      row.iter().enumerate().take(
        column_count
      )
    {
      widths[idx] = widths[idx]
        .max(visible_width(cell));
    }
  }

  write_row(&mut writer, headers, &widths)?;
  for width in &widths {
    write!(
      writer,
      "{:-<width$} ",
      "",
      width = *width
    )?;
  }
  writeln!(writer)?;

  for row in rows {
    write_row(&mut writer, &row, &widths)?;
  }

  Ok(())
}

fn write_row<W: Write>(
  writer: &mut W,
  cells: &[String],
  widths: &[usize]
) -> anyhow::Result<()> {
  for (cell, width) in
    cells.iter().zip(widths)
  {
    let padding = width
      .saturating_sub(visible_width(
        cell
      ));
    write!(
      writer,
      "{}{} ",
      cell,
      " ".repeat(padding)
    )?;
  }
  writeln!(writer)?;
  Ok(())
}

fn visible_width(text: &str) -> usize {
  UnicodeWidthStr::width(
    strip_ansi(text).as_str()
  )
}

fn strip_ansi(s: &str) -> String {
  let mut out =
    String::with_capacity(s.len());
  let mut escaped = false;

  for ch in s.chars() {
    if escaped {
      if ch == 'm' {
        escaped = false;
      }
      continue;
    }

    if ch == '\x1b' {
      escaped = true;
      continue;
    }

    out.push(ch);
  }

  out
}
