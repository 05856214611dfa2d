//! Interaction hooks. Grids never act on a
//! selection themselves; they report it to
//! a caller-supplied handler.

use chrono::NaiveDate;

use crate::event::Event;

pub trait SelectionHandler {
  /// A month cell or a week-view hour slot
  /// was selected.
  fn on_cell_or_slot_select(
    &mut self,
    date: NaiveDate,
    hour: u32
  );

  fn on_event_select(
    &mut self,
    event: &Event
  );
}

/// Adapts a pair of closures into a
/// [`SelectionHandler`].
pub struct FnHandler<C, E> {
  on_cell:  C,
  on_event: E
}

impl<C, E> FnHandler<C, E>
where
  C: FnMut(NaiveDate, u32),
  E: FnMut(&Event)
{
  pub fn new(
    on_cell: C,
    on_event: E
  ) -> Self {
    Self { on_cell, on_event }
  }
}

impl<C, E> SelectionHandler
  for FnHandler<C, E>
where
  C: FnMut(NaiveDate, u32),
  E: FnMut(&Event)
{
  fn on_cell_or_slot_select(
    &mut self,
    date: NaiveDate,
    hour: u32
  ) {
    (self.on_cell)(date, hour);
  }

  fn on_event_select(
    &mut self,
    event: &Event
  ) {
    (self.on_event)(event);
  }
}
