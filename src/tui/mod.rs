//! Interactive terminal front-end for the editor.

mod render;

pub use render::draw;

use std::io::stdout;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::SetTitle;
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tracing::{debug, warn};

use crate::editor::{EditorController, EventReceiver};
use crate::models::FieldName;

/// A user action decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Save,
    Previous,
    Next,
    Back,
    Forward,
    FocusNext,
    FocusPrevious,
    Insert(char),
    Backspace,
}

/// Map a key press to an action.
pub fn action_for(key: &KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('s') if ctrl => Some(Action::Save),
        KeyCode::Char('p') if ctrl => Some(Action::Previous),
        KeyCode::Char('n') if ctrl => Some(Action::Next),
        KeyCode::Left if alt => Some(Action::Back),
        KeyCode::Right if alt => Some(Action::Forward),
        KeyCode::Tab | KeyCode::Down => Some(Action::FocusNext),
        KeyCode::BackTab | KeyCode::Up => Some(Action::FocusPrevious),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c) if !ctrl && !alt => Some(Action::Insert(c)),
        _ => None,
    }
}

/// Terminal application state around the controller.
pub struct App {
    controller: EditorController,
    focus: usize,
}

impl App {
    pub fn new(controller: EditorController) -> Self {
        let mut app = Self {
            controller,
            focus: 0,
        };
        app.set_focus(0);
        app
    }

    pub fn controller(&self) -> &EditorController {
        &self.controller
    }

    pub fn focused_field(&self) -> FieldName {
        FieldName::ALL[self.focus]
    }

    /// Apply an action. Returns false when the app should exit.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return false,
            Action::Save => self.controller.save(),
            Action::Previous => self.controller.navigate_previous(),
            Action::Next => self.controller.navigate_next(),
            Action::Back => {
                if !self.controller.go_back() {
                    debug!("Already at the oldest history entry");
                }
            }
            Action::Forward => {
                if !self.controller.go_forward() {
                    debug!("Already at the newest history entry");
                }
            }
            Action::FocusNext => self.set_focus((self.focus + 1) % FieldName::ALL.len()),
            Action::FocusPrevious => {
                let len = FieldName::ALL.len();
                self.set_focus((self.focus + len - 1) % len)
            }
            Action::Insert(c) => {
                let field = self.focused_field();
                self.controller.view_mut().field_mut(field).push_char(c);
            }
            Action::Backspace => {
                let field = self.focused_field();
                self.controller.view_mut().field_mut(field).backspace();
            }
        }
        true
    }

    fn set_focus(&mut self, index: usize) {
        let view = self.controller.view_mut();
        view.field_mut(FieldName::ALL[self.focus]).set_focused(false);
        self.focus = index;
        view.field_mut(FieldName::ALL[index]).set_focused(true);
    }
}

/// Run the editor until the user quits. Restores the terminal on exit.
pub async fn run(controller: EditorController, events: EventReceiver) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, App::new(controller), events).await;
    ratatui::restore();
    result
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    mut app: App,
    mut events: EventReceiver,
) -> anyhow::Result<()> {
    let mut input = EventStream::new();
    let mut title = String::new();

    app.controller.init();

    loop {
        terminal.draw(|frame| draw(frame, app.controller.view()))?;

        let header_title = &app.controller.view().header.title;
        if !header_title.is_empty() && *header_title != title {
            title = header_title.clone();
            if let Err(e) = crossterm::execute!(stdout(), SetTitle(&title)) {
                warn!("Could not set terminal title: {}", e);
            }
        }

        tokio::select! {
            maybe_event = input.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => {
                    if let Some(action) = action_for(&key) {
                        if !app.apply(action) {
                            break;
                        }
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(event) = events.recv() => app.controller.handle(event),
        }
    }

    Ok(())
}
