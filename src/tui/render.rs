//! Layout and drawing of the editor view.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::Frame;

use crate::models::FieldName;
use crate::view::{EditorView, NavigationBar, SaveButton};

const KEY_HINTS: &str =
    "Tab/↑↓ field · Ctrl-S save · Ctrl-P/Ctrl-N prev/next · Alt-←/→ back/forward · Esc quit";

/// Draw the whole editor.
pub fn draw(frame: &mut Frame, view: &EditorView) {
    let banner_height = if view.banner.is_visible() { 3 } else { 0 };

    let mut constraints = vec![
        Constraint::Length(1), // header
        Constraint::Length(4), // status indicator
    ];
    constraints.extend(FieldName::ALL.iter().map(|_| Constraint::Length(3)));
    constraints.extend([
        Constraint::Length(3),             // save + navigation
        Constraint::Length(1),             // pdf source
        Constraint::Length(banner_height), // error banner
        Constraint::Min(0),
        Constraint::Length(1), // key hints
    ]);

    let areas = Layout::vertical(constraints).split(frame.area());
    let mut next = areas.iter().copied();
    let mut take = || next.next().unwrap_or_default();

    draw_header(frame, view, take());
    frame.render_widget(view.status.widget(), take());
    for field in view.fields() {
        frame.render_widget(field.widget(), take());
    }
    draw_actions(frame, view, take());
    draw_pdf_source(frame, view, take());
    let banner_area = take();
    if let Some(message) = &view.banner.message {
        let banner = Paragraph::new(message.as_str())
            .style(Style::default().fg(Color::White).bg(Color::Red))
            .block(Block::bordered().title("Error"))
            .wrap(Wrap { trim: true });
        frame.render_widget(banner, banner_area);
    }
    let _spacer = take();
    frame.render_widget(
        Paragraph::new(KEY_HINTS).style(Style::default().fg(Color::DarkGray)),
        take(),
    );
}

fn draw_header(frame: &mut Frame, view: &EditorView, area: Rect) {
    let filename = if view.header.current_filename.is_empty() {
        "..."
    } else {
        view.header.current_filename.as_str()
    };
    let line = Line::from(vec![
        Span::styled(
            "PDFF Core ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(filename.to_string()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_actions(frame: &mut Frame, view: &EditorView, area: Rect) {
    let [save_area, nav_area] =
        Layout::horizontal([Constraint::Length(16), Constraint::Min(0)]).areas(area);
    frame.render_widget(save_button(&view.save_button), save_area);
    frame.render_widget(navigation(&view.navigation), nav_area);
}

fn save_button(button: &SaveButton) -> Paragraph<'static> {
    let style = if button.enabled {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Paragraph::new(Span::styled(format!(" {} ", button.label.text()), style))
        .block(Block::bordered())
}

fn navigation(bar: &NavigationBar) -> Paragraph<'static> {
    let arrow = |enabled: bool, text: &'static str| {
        if enabled {
            Span::styled(text, Style::default().add_modifier(Modifier::BOLD))
        } else {
            Span::styled(text, Style::default().fg(Color::DarkGray))
        }
    };
    let line = Line::from(vec![
        arrow(bar.previous_enabled, "◀ "),
        Span::raw(bar.previous_info.clone()),
        Span::raw("  "),
        Span::styled(bar.position.clone(), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::raw(bar.next_info.clone()),
        arrow(bar.next_enabled, " ▶"),
    ]);
    Paragraph::new(line).block(Block::bordered().title("Unprocessed"))
}

fn draw_pdf_source(frame: &mut Frame, view: &EditorView, area: Rect) {
    let source = view.pdf_viewer.source.as_deref().unwrap_or("");
    let line = Line::from(vec![
        Span::styled("PDF: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            source.to_string(),
            Style::default().add_modifier(Modifier::UNDERLINED),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Neighbor, NavigationCursor};
    use crate::status::Status;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(view: &EditorView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| draw(frame, view)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_draw_initial_view() {
        let view = EditorView::default();
        let text = screen(&view);
        assert!(text.contains("Cannot generate filename"));
        assert!(text.contains("Correspondent"));
        assert!(text.contains("Document date"));
        assert!(text.contains("Save"));
        assert!(!text.contains("Error"));
    }

    #[test]
    fn test_draw_reflects_state() {
        let mut view = EditorView::default();
        view.header.set_filename("scan_0001.pdf");
        view.status.set_status(Status::Unsaved);
        view.status.set_filename("20240131_ACME_Invoice.pdf");
        view.field_mut(FieldName::Correspondent).input("ACME");
        view.navigation.apply(&NavigationCursor {
            previous: Some(Neighbor {
                id: "aaaaaaaa-1111".to_string(),
            }),
            next: None,
            current_position: 2,
            total_unprocessed: 5,
        });
        view.banner.show("Saving failed: HTTP 500");

        let text = screen(&view);
        assert!(text.contains("scan_0001.pdf"));
        assert!(text.contains("Not saved"));
        assert!(text.contains("20240131_ACME_Invoice.pdf"));
        assert!(text.contains("ACME"));
        assert!(text.contains("aaaaaaaa..."));
        assert!(text.contains("(2 of 5)"));
        assert!(text.contains("Saving failed: HTTP 500"));
    }
}
