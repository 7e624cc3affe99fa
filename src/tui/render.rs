//! Player screen rendering.
//!
//! Draws the current scene, the overlays held by the [`OverlaySurface`],
//! a progress bar, the latest notice and the key hints. Overlays are placed
//! inside the video area according to their [`GeometryHint`].

use std::time::Duration;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme::{current_theme, Role, Theme};
use crate::playback::Playback;
use crate::player::{OverlayKind, PlaybackMachine, PlayerState};
use crate::surface::{ChoiceOffer, ChoiceView, GeometryHint, InterruptPanel, OverlaySurface};

/// Format a duration as MM:SS.
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    format!("{:02}:{:02}", mins, secs)
}

/// Build the progress bar text: filled part, playhead, remaining part.
pub fn progress_bar(bar_width: usize, position: Duration, duration: Duration) -> String {
    if bar_width == 0 {
        return String::new();
    }
    let progress = if duration.is_zero() {
        1.0
    } else {
        (position.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
    };
    let filled = ((bar_width as f64 * progress) as usize).min(bar_width);

    let mut bar = String::with_capacity(bar_width * 3);
    bar.extend(std::iter::repeat('━').take(filled));
    if filled < bar_width {
        bar.push('⏺');
        bar.extend(std::iter::repeat('─').take(bar_width - filled - 1));
    }
    bar
}

/// Cut `text` to at most `max_width` display columns, ending in `…` if cut.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Place an overlay inside `area` from its relative placement.
pub fn overlay_rect(area: Rect, hint: GeometryHint) -> Rect {
    let scale = |value: f32, total: u16| ((value.clamp(0.0, 1.0) * total as f32).round()) as u16;

    let x = area.x + scale(hint.x, area.width).min(area.width);
    let y = area.y + scale(hint.y, area.height).min(area.height);
    let max_width = area.right().saturating_sub(x);
    let max_height = area.bottom().saturating_sub(y);
    let width = scale(hint.width, area.width).clamp(1, max_width.max(1));
    let height = scale(hint.height, area.height).clamp(1, max_height.max(1));
    Rect::new(x, y, width.min(max_width), height.min(max_height))
}

/// Build styled spans for footer keybinding hints.
///
/// Keys use the accent color, descriptions the secondary color, and
/// entries are separated by " | ".
fn build_footer_spans(keys: &[(&str, &str)], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(keys.len() * 3);
    for (i, (key, desc)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ".to_string(), theme.style(Role::Muted)));
        }
        spans.push(Span::styled(key.to_string(), theme.style(Role::Key)));
        spans.push(Span::styled(
            format!(": {}", desc),
            theme.style(Role::Muted),
        ));
    }
    spans
}

/// Key hints for the current state.
fn footer_keys(state: &PlayerState, surface: &OverlaySurface) -> Vec<(&'static str, &'static str)> {
    let mut keys = Vec::new();
    if surface.choice_offer().is_some() {
        keys.push(("1-9", "choose"));
    }
    if surface.interrupt_panel().is_some() {
        keys.push(("a-h", "side path"));
    }
    if state.is_interrupted() {
        keys.push(("s", "skip back"));
    }
    keys.push(("space", "pause"));
    keys.push(("←/→", "seek"));
    keys.push(("+/-", "volume"));
    keys.push(("m", "mute"));
    if !surface.notices().is_empty() {
        keys.push(("x", "dismiss"));
    }
    keys.push(("q", "quit"));
    keys
}

/// Short viewer-facing name of a state.
pub fn state_label(state: &PlayerState) -> &'static str {
    match state {
        PlayerState::Idle => "idle",
        PlayerState::Playing { .. } => "playing",
        PlayerState::PendingChoice { .. } => "choosing",
        PlayerState::Interrupted { .. } => "side path",
    }
}

/// Draw the whole player screen.
pub fn draw<P: Playback>(frame: &mut Frame, machine: &PlaybackMachine<P, OverlaySurface>) {
    let theme = current_theme();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Min(5),    // video area
            Constraint::Length(1), // progress
            Constraint::Length(1), // notice
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_title(frame, rows[0], machine, &theme);
    render_video(frame, rows[1], machine, &theme);
    render_progress(frame, rows[2], machine.playback(), &theme);
    render_notice(frame, rows[3], machine.surface(), &theme);

    let keys = footer_keys(machine.state(), machine.surface());
    let footer = Paragraph::new(Line::from(build_footer_spans(&keys, &theme)))
        .alignment(Alignment::Center);
    frame.render_widget(footer, rows[4]);
}

fn render_title<P: Playback>(
    frame: &mut Frame,
    area: Rect,
    machine: &PlaybackMachine<P, OverlaySurface>,
    theme: &Theme,
) {
    let state = machine.state();
    let mut spans = vec![
        Span::styled("branchplay", theme.bold(Role::Key)),
        Span::styled(
            format!("  [{}]", state_label(state)),
            theme.style(Role::Muted),
        ),
    ];
    if let Some((scene, position)) = state.resume_point() {
        spans.push(Span::styled(
            format!("  returns to {} at {}", scene, format_duration(position)),
            theme.style(Role::SidePath),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_video<P: Playback>(
    frame: &mut Frame,
    area: Rect,
    machine: &PlaybackMachine<P, OverlaySurface>,
    theme: &Theme,
) {
    let state = machine.state();
    let title = match state.current_scene() {
        Some(scene) => {
            let scene_type = machine
                .graph()
                .scene(scene)
                .map(|s| s.scene_type.label())
                .unwrap_or("other");
            format!(" {} ({}) ", scene, scene_type)
        }
        None => " no scene ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.style(Role::Muted))
        .title(Span::styled(title, theme.style(Role::Text)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let playback = machine.playback();
    let status = match (playback.duration(), playback.is_playing()) {
        (None, _) => "■ no clip",
        (Some(_), true) => "▶ playing",
        (Some(duration), false) if playback.position() >= duration => "■ ended",
        (Some(_), false) => "⏸ paused",
    };
    let middle = Rect::new(
        inner.x,
        inner.y + inner.height / 2,
        inner.width,
        inner.height.min(1),
    );
    frame.render_widget(
        Paragraph::new(status)
            .style(theme.style(Role::Muted))
            .alignment(Alignment::Center),
        middle,
    );

    let surface = machine.surface();
    if let Some(offer) = surface.choice_offer() {
        let area = overlay_rect(inner, surface.geometry(offer.kind));
        render_offer(frame, area, offer, theme);
    }
    if let Some(panel) = surface.interrupt_panel() {
        render_interrupt_panel(
            frame,
            overlay_rect(inner, surface.geometry(OverlayKind::Interrupt)),
            panel,
            theme,
        );
    }
}

fn choice_lines(
    choices: &[ChoiceView],
    keys: impl Iterator<Item = char>,
    width: usize,
    theme: &Theme,
) -> Vec<Line<'static>> {
    choices
        .iter()
        .zip(keys)
        .map(|(choice, key)| {
            let marker = if choice.image.is_some() { " ▣" } else { "" };
            let label = truncate_to_width(&choice.label, width.saturating_sub(4 + marker.width()));
            Line::from(vec![
                Span::styled(format!("{} ", key), theme.bold(Role::Key)),
                Span::styled(label, theme.style(Role::Text)),
                Span::styled(marker.to_string(), theme.style(Role::Muted)),
            ])
        })
        .collect()
}

fn render_offer(frame: &mut Frame, area: Rect, offer: &ChoiceOffer, theme: &Theme) {
    let width = area.width.saturating_sub(2) as usize;
    let heading = offer.heading.as_deref().unwrap_or(match offer.kind {
        OverlayKind::Question => "Your answer?",
        OverlayKind::MainPanel => "Where to?",
        _ => "What next?",
    });
    let mut lines = choice_lines(&offer.choices, '1'..='9', width, theme);
    if lines.is_empty() {
        lines.push(Line::from(Span::styled("(no choices)", theme.style(Role::Muted))));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.style(Role::Key))
        .title(Span::styled(
            format!(" {} ", truncate_to_width(heading, width.saturating_sub(2))),
            theme.bold(Role::Key),
        ));
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_interrupt_panel(frame: &mut Frame, area: Rect, panel: &InterruptPanel, theme: &Theme) {
    let width = area.width.saturating_sub(2) as usize;
    let heading = panel.heading.as_deref().unwrap_or("Side paths");
    let mut lines = choice_lines(&panel.choices, 'a'..='h', width, theme);
    if panel.skip_visible {
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("s ", theme.bold(Role::Key)),
            Span::styled(
                truncate_to_width("skip back", width.saturating_sub(2)),
                theme.bold(Role::SidePath),
            ),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.style(Role::SidePath))
        .title(Span::styled(
            format!(" {} ", truncate_to_width(heading, width.saturating_sub(2))),
            theme.style(Role::SidePath),
        ));
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Volume as shown next to the progress bar.
pub fn volume_label<P: Playback>(playback: &P) -> String {
    if playback.is_muted() {
        "muted".to_string()
    } else {
        format!("vol {}%", playback.volume())
    }
}

fn render_progress<P: Playback>(frame: &mut Frame, area: Rect, playback: &P, theme: &Theme) {
    let duration = playback.duration().unwrap_or_default();
    let position = playback.position();
    let time_display = format!(
        " {}/{}",
        format_duration(position),
        format_duration(duration)
    );
    let volume = format!("  {}", volume_label(playback));
    let bar_width = (area.width as usize).saturating_sub(time_display.width() + volume.width() + 1);
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(
            progress_bar(bar_width, position, duration),
            theme.style(Role::Key),
        ),
        Span::styled(time_display, theme.style(Role::Text)),
        Span::styled(volume, theme.style(Role::Muted)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_notice(frame: &mut Frame, area: Rect, surface: &OverlaySurface, theme: &Theme) {
    let Some(notice) = surface.latest_notice() else {
        return;
    };
    let text = truncate_to_width(&notice.message, area.width.saturating_sub(1) as usize);
    frame.render_widget(
        Paragraph::new(format!(" {}", text)).style(theme.style(notice.level.into())),
        area,
    );
}
