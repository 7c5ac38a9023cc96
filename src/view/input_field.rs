//! Labelled text/date input with change tracking and debounced notification.

use std::time::Duration;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::editor::{EditorEvent, EventSender};
use crate::models::{FieldName, InputKind};
use crate::timer::Debouncer;

/// Idle time after the last keystroke before `ValueChanged` is emitted.
pub const FIELD_DEBOUNCE: Duration = Duration::from_millis(300);

/// Visual state of an input relative to its baseline value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldState {
    #[default]
    Empty,
    Filled,
    Changed,
    Error,
}

impl FieldState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldState::Empty => "empty",
            FieldState::Filled => "filled",
            FieldState::Changed => "changed",
            FieldState::Error => "error",
        }
    }

    /// State of `value` compared against `baseline`.
    pub fn for_value(value: &str, baseline: &str) -> Self {
        if value.is_empty() {
            FieldState::Empty
        } else if value != baseline {
            FieldState::Changed
        } else {
            FieldState::Filled
        }
    }
}

/// A single metadata input.
///
/// Every observed property change re-renders the cached widget; setting a
/// property to its current value does nothing.
pub struct InputField {
    name: FieldName,
    label: String,
    kind: InputKind,
    placeholder: String,
    required: bool,
    value: String,
    state: FieldState,
    baseline: String,
    focused: bool,
    debounce: Debouncer,
    debounce_delay: Duration,
    events: Option<EventSender>,
    rendered: Paragraph<'static>,
}

impl InputField {
    pub fn new(name: FieldName) -> Self {
        Self::with_debounce(name, FIELD_DEBOUNCE)
    }

    pub fn with_debounce(name: FieldName, debounce_delay: Duration) -> Self {
        let mut field = Self {
            name,
            label: name.label().to_string(),
            kind: name.kind(),
            placeholder: name.placeholder().to_string(),
            required: name.is_required(),
            value: String::new(),
            state: FieldState::Empty,
            baseline: String::new(),
            focused: false,
            debounce: Debouncer::new(),
            debounce_delay,
            events: None,
            rendered: Paragraph::new(""),
        };
        field.render();
        field
    }

    /// Route debounced `ValueChanged` events to `events`.
    pub fn connect(&mut self, events: EventSender) {
        self.events = Some(events);
    }

    pub fn name(&self) -> FieldName {
        self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    /// Value recorded by the last `set_original_value`, `rebase` or `reset`.
    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    /// False when the value cannot be sent for this input kind, e.g. a
    /// malformed date.
    pub fn is_valid(&self) -> bool {
        self.kind.accepts(&self.value)
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn widget(&self) -> &Paragraph<'static> {
        &self.rendered
    }

    /// Set the value without touching state or baseline.
    pub fn set_value(&mut self, value: &str) {
        if self.value != value {
            self.value = value.to_string();
            self.render();
        }
    }

    pub fn set_state(&mut self, state: FieldState) {
        if self.state != state {
            self.state = state;
            self.render();
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            self.render();
        }
    }

    /// Handle user input: update value and state now, notify after the
    /// debounce delay. A new input restarts the delay.
    pub fn input(&mut self, value: &str) {
        self.set_value(value);
        self.set_state(self.derived_state());

        if let Some(events) = self.events.clone() {
            let field = self.name;
            let value = self.value.clone();
            self.debounce.schedule(self.debounce_delay, move || {
                let _ = events.send(EditorEvent::ValueChanged { field, value });
            });
        }
    }

    pub fn push_char(&mut self, c: char) {
        let mut value = self.value.clone();
        value.push(c);
        self.input(&value);
    }

    pub fn backspace(&mut self) {
        if self.value.is_empty() {
            return;
        }
        let mut value = self.value.clone();
        value.pop();
        self.input(&value);
    }

    /// Clear value, state and baseline. Drops any pending notification.
    pub fn reset(&mut self) {
        self.debounce.cancel();
        self.baseline.clear();
        self.set_value("");
        self.set_state(FieldState::Empty);
    }

    /// Record `value` as the new baseline and display it.
    pub fn set_original_value(&mut self, value: &str) {
        self.debounce.cancel();
        self.baseline = value.to_string();
        self.set_value(value);
        self.set_state(self.derived_state());
    }

    /// Record a new baseline but keep the current value and any pending
    /// notification.
    pub fn rebase(&mut self, baseline: &str) {
        self.baseline = baseline.to_string();
        self.set_state(self.derived_state());
    }

    fn derived_state(&self) -> FieldState {
        if self.is_valid() {
            FieldState::for_value(&self.value, &self.baseline)
        } else {
            FieldState::Error
        }
    }

    fn render(&mut self) {
        let border = match (self.state, self.focused) {
            (FieldState::Error, _) => Color::Red,
            (FieldState::Changed, _) => Color::Blue,
            (_, true) => Color::Green,
            _ => Color::DarkGray,
        };

        let mut title = vec![Span::styled(
            self.label.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if self.required {
            title.push(Span::styled(" *", Style::default().fg(Color::Yellow)));
        }
        if self.kind == InputKind::Date {
            title.push(Span::styled(
                format!(" ({})", self.kind.as_str()),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let body = if self.value.is_empty() {
            Span::styled(
                self.placeholder.clone(),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            Span::raw(self.value.clone())
        };
        let mut line = vec![body];
        if self.focused {
            line.push(Span::styled(
                "_",
                Style::default().add_modifier(Modifier::SLOW_BLINK),
            ));
        }

        let block = Block::bordered()
            .title(Line::from(title))
            .border_style(Style::default().fg(border));

        self.rendered = Paragraph::new(Line::from(line)).block(block);
    }
}
