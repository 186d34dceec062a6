use crate::application::{format_cents, App, HomeEntry, HostMode};
use crate::domain::{Payload, StepKey};
use crate::presentation::{dialog_region, host_region};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Widget, Wrap},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_home(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);

    let nav = app.session.navigator();
    if !nav.is_empty() && (app.session.host().is_open() || app.exit_progress().is_some()) {
        render_host(f, app, f.area());
    }
    if app.session.confirmation().is_open() {
        render_confirmation(f, app);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let who = if app.signed_in { "signed in" } else { "signed out" };
    let header = Paragraph::new(format!("navdeck - Account | {}", who))
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_home(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = HomeEntry::ALL
        .iter()
        .map(|entry| ListItem::new(entry.label()))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Account"))
        .highlight_style(Style::default().bg(Color::LightBlue).fg(Color::Black))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if app.is_home() {
        state.select(Some(app.home_selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let dialog = app.session.confirmation();
    let (text, style) = if dialog.is_open() {
        let text = if dialog.is_loading() {
            "Working... please wait".to_string()
        } else {
            "Enter/y: confirm | Esc/n: cancel".to_string()
        };
        (text, Style::default().fg(Color::Yellow))
    } else if let Some(ref status) = app.status_message {
        (status.clone(), Style::default())
    } else if app.is_home() {
        (
            "↑↓/jk: select | Enter: open | d: support | s: sign in/out | q: quit".to_string(),
            Style::default(),
        )
    } else {
        (
            "Enter: open | Backspace: back | Esc: close | d: support | x: withdraw/end | p: pay"
                .to_string(),
            Style::default().fg(Color::Green),
        )
    };

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(status, area);
}

fn render_host(f: &mut Frame, app: &App, area: Rect) {
    let region = host_region(app, area);
    if region.width < 3 || region.height < 3 {
        return;
    }
    f.render_widget(Clear, region);

    let host = app.session.host();
    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(host.config().aria_label.clone())
        .border_style(Style::default().fg(Color::Cyan));
    if host.is_locked() {
        block = block.title_bottom(Line::from(" locked ").alignment(Alignment::Right));
    }
    let inner = block.inner(region);
    f.render_widget(block, region);

    let mut content = inner;
    if app.host_mode() == HostMode::BottomSheet && content.height > 1 {
        let handle_style = if host.is_locked() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Gray)
        };
        let handle = Paragraph::new("━━━━━━").alignment(Alignment::Center).style(handle_style);
        f.render_widget(handle, Rect { height: 1, ..content });
        content.y += 1;
        content.height -= 1;
    }

    let offset = app.transition.offset(content.width);
    let paragraph = Paragraph::new(frame_lines(app)).wrap(Wrap { trim: false });
    render_sliding(paragraph, content, offset, f.buffer_mut());
}

/// Renders `paragraph` displaced horizontally by `offset` inside `area`.
///
/// Forward content enters from the right edge, backward content from the
/// left with its leading columns clipped.
fn render_sliding(paragraph: Paragraph<'_>, area: Rect, offset: i32, buf: &mut Buffer) {
    let shift = u16::try_from(offset.unsigned_abs()).unwrap_or(u16::MAX).min(area.width);
    if shift == 0 {
        paragraph.render(area, buf);
    } else if offset > 0 {
        let shifted = Rect {
            x: area.x + shift,
            width: area.width - shift,
            ..area
        };
        paragraph.render(shifted, buf);
    } else {
        let mut scratch = Buffer::empty(Rect::new(0, 0, area.width, area.height));
        paragraph.render(scratch.area, &mut scratch);
        for y in 0..area.height {
            for x in 0..area.width - shift {
                buf[(area.x + x, area.y + y)] = scratch[(x + shift, y)].clone();
            }
        }
    }
}

/// Text for the navigator's top frame. Steps whose data has not arrived yet
/// show a loading line instead.
pub fn frame_lines(app: &App) -> Vec<Line<'static>> {
    let nav = app.session.navigator();
    let Some(step) = nav.current_page() else {
        return Vec::new();
    };
    let selected = Style::default().bg(Color::LightBlue).fg(Color::Black);

    match (step, nav.data_passed()) {
        (StepKey::Chats, Some(Payload::Chats(list))) => {
            if list.conversations.is_empty() {
                return vec![Line::from("No conversations yet")];
            }
            list.conversations
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    let unread = if c.unread > 0 {
                        format!(" ({})", c.unread)
                    } else {
                        String::new()
                    };
                    let line = Line::from(vec![
                        Span::styled(
                            format!("{}{}", c.counterpart, unread),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(format!(" - {}", c.last_message)),
                    ]);
                    if i == app.list_selected {
                        line.style(selected)
                    } else {
                        line
                    }
                })
                .collect()
        }
        (StepKey::Chats, _) => vec![Line::from("Loading conversations...")],
        (StepKey::Chatroom, Some(Payload::Chatroom(room))) if room.messages.is_empty() => {
            vec![Line::from(format!("Loading messages for {}...", room.chat_id))]
        }
        (StepKey::Chatroom, Some(Payload::Chatroom(room))) => room
            .messages
            .iter()
            .map(|m| {
                if m.from_me {
                    Line::from(format!("You: {}", m.body)).alignment(Alignment::Right)
                } else {
                    Line::from(format!("Them: {}", m.body))
                }
            })
            .collect(),
        (StepKey::Chatroom, _) => vec![Line::from("Loading messages...")],
        (StepKey::SupportPage, _) => vec![
            Line::from("Need help with a booking or payment?"),
            Line::from(""),
            Line::from("Email support@navdeck.example or open Messages"),
            Line::from("and start a chat with Support."),
        ],
        (StepKey::Auth, _) => vec![
            Line::from("Your session has ended."),
            Line::from(""),
            Line::from("Press Enter to sign in again."),
        ],
        (StepKey::Wallet, Some(Payload::Wallet(wallet))) => vec![
            Line::from(format!("Balance: {}", format_cents(wallet.balance_cents))),
            Line::from(format!("Pending payouts: {}", wallet.pending_payouts)),
            Line::from(""),
            Line::from("Enter: pay an outstanding booking"),
        ],
        (StepKey::Wallet, _) => vec![Line::from("Loading wallet...")],
        (StepKey::TenantApplication, Some(Payload::TenantApplication(draft))) => vec![
            Line::from(format!("Listing: {}", draft.listing_id)),
            Line::from(format!(
                "Move-in: {}",
                draft.move_in.as_deref().unwrap_or("not set")
            )),
            Line::from(format!("Occupants: {}", draft.occupants)),
            Line::from(""),
            Line::from("x: withdraw application"),
        ],
        (StepKey::ApplicationReview, Some(Payload::ApplicationReview(review))) => vec![
            Line::from(format!("Application {}", review.application_id)),
            Line::from(format!("Applicant: {}", review.applicant)),
            Line::from(""),
            Line::from("Enter: view the application"),
        ],
        (StepKey::RentalManagement, Some(Payload::RentalManagement(rental))) => vec![
            Line::from(format!("{} ({})", rental.property, rental.rental_id)),
            Line::from(""),
            Line::from("Enter: message tenant | x: end rental"),
        ],
        (StepKey::ProfileEdit, Some(Payload::ProfileEdit(field))) => vec![
            Line::from(format!("{}: {}", field.field, field.current)),
            Line::from(""),
            Line::from("Enter: confirm your identity to edit"),
        ],
        (StepKey::BookingPayment, Some(Payload::BookingPayment(intent))) => vec![
            Line::from(format!("Booking {}", intent.booking_id)),
            Line::from(format!("Amount due: {}", format_cents(intent.amount_cents))),
            Line::from(""),
            Line::from("p: pay now"),
        ],
        (step, _) => vec![Line::from(format!("Loading {}...", step))],
    }
}

fn render_confirmation(f: &mut Frame, app: &App) {
    let dialog = app.session.confirmation();
    let area = dialog_region(f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(dialog.config().title.clone())
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let description = Paragraph::new(dialog.config().description.clone()).wrap(Wrap { trim: true });
    f.render_widget(description, chunks[0]);

    let enabled = Style::default().add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(Color::DarkGray);
    let mut buttons = Vec::new();
    if !dialog.is_informational() {
        let style = if dialog.submit_enabled() { enabled } else { disabled };
        buttons.push(Span::styled(format!("[ {} ]", dialog.submit_label()), style));
        buttons.push(Span::raw("  "));
    }
    let style = if dialog.close_enabled() { enabled } else { disabled };
    buttons.push(Span::styled(format!("[ {} ]", dialog.close_label()), style));
    if dialog.is_loading() {
        buttons.push(Span::raw("  working..."));
    }

    let row = Paragraph::new(Line::from(buttons)).alignment(Alignment::Right);
    f.render_widget(row, chunks[1]);
}
