use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph};

use tallgrass::battle::{BattleView, CreatureDisplay};
use tallgrass::session::{DialogueView, SpriteView};
use tallgrass::{FrameView, Scene};

#[derive(Debug, Clone, Default)]
pub struct Status {
    pub fps: f64,
    pub ticks: u64,
    pub tile_size: f32,
    pub source: &'static str,
    pub music: Option<String>,
}

pub fn render(frame: &mut Frame, view: &FrameView, status: &Status) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], view, status);
    match &view.scene {
        Scene::Loading => render_loading(frame, chunks[1]),
        Scene::World { sprites, .. } => render_world(frame, chunks[1], sprites, status.tile_size),
        Scene::Battle(battle) => render_battle(frame, chunks[1], battle),
        Scene::Tutorial { page, row1, row2 } => render_tutorial(frame, chunks[1], *page, row1, row2),
    }
    render_chat(frame, chunks[2], &view.chat);
    render_help(frame, chunks[3], &view.scene);

    if let Some(dialogue) = &view.dialogue {
        render_dialogue(frame, chunks[1], dialogue);
    }
}

fn render_header(frame: &mut Frame, area: Rect, view: &FrameView, status: &Status) {
    let block = Block::default()
        .title(format!(" Tallgrass - {} ", status.source))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let latency = view
        .latency_ms
        .map_or_else(|| "-".to_string(), |ms| format!("{ms:.0}ms"));
    let text = format!(
        "{}  |  FPS: {:.0}  |  Ticks: {}  |  Entities: {}  |  Ping: {}  |  Music: {}",
        view.scene.as_str(),
        status.fps,
        status.ticks,
        view.entity_count,
        latency,
        status.music.as_deref().unwrap_or("-"),
    );

    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, area);
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new("Waiting for the first snapshot...")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

/// Each tile is two cells wide so the map keeps a square-ish aspect.
fn render_world(frame: &mut Frame, area: Rect, sprites: &[SpriteView], tile_size: f32) {
    let block = Block::default()
        .title(" World ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = inner.width as usize;
    let rows = inner.height as usize;
    let mut grid = vec![vec![' '; cols]; rows];
    let mut labels = Vec::new();

    let tile_size = tile_size.max(1.0);
    // camera space spans the viewport, fold it into the terminal area
    let Some(local) = sprites.iter().find(|s| s.local) else {
        frame.render_widget(Paragraph::new("..."), inner);
        return;
    };
    let origin_x = local.screen.x / tile_size * 2.0 - cols as f32 / 2.0;
    let origin_y = local.screen.y / tile_size - rows as f32 / 2.0;

    for sprite in sprites {
        let col = (sprite.screen.x / tile_size * 2.0 - origin_x).round() as i32;
        let row = (sprite.screen.y / tile_size - origin_y).round() as i32;
        if col < 0 || row < 0 || col as usize >= cols || row as usize >= rows {
            continue;
        }
        let glyph = if sprite.local { '@' } else { sprite.name.chars().next().unwrap_or('?') };
        grid[row as usize][col as usize] = glyph;
        labels.push(format!("{} {} ({}, {})", glyph, sprite.name, sprite.tile.x, sprite.tile.y));
    }

    let lines: Vec<Line> = grid
        .into_iter()
        .map(|row| Line::from(row.into_iter().collect::<String>()))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);

    let legend_height = labels.len().min(rows) as u16;
    if legend_height > 0 && inner.width > 30 {
        let legend_area = Rect {
            x: inner.x + inner.width - 30,
            y: inner.y,
            width: 30,
            height: legend_height,
        };
        let items: Vec<ListItem> = labels.into_iter().map(ListItem::new).collect();
        frame.render_widget(List::new(items).style(Style::default().fg(Color::DarkGray)), legend_area);
    }
}

fn creature_gauge(frame: &mut Frame, area: Rect, title: &str, creature: Option<&CreatureDisplay>, color: Color) {
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    match creature {
        Some(creature) => {
            let gauge = Gauge::default()
                .block(block)
                .gauge_style(Style::default().fg(color))
                .ratio(creature.vitality_fraction() as f64)
                .label(format!(
                    "{} Lv{}  {}/{}",
                    creature.name, creature.level, creature.vitality, creature.max_vitality
                ));
            frame.render_widget(gauge, area);
        }
        None => frame.render_widget(Paragraph::new("???").block(block), area),
    }
}

fn render_battle(frame: &mut Frame, area: Rect, battle: &BattleView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(area);

    creature_gauge(frame, chunks[0], "Opponent", battle.opponent.as_ref(), Color::Red);
    creature_gauge(frame, chunks[1], "Yours", battle.player.as_ref(), Color::Green);

    let text = vec![
        Line::from(battle.text.row1.as_str()),
        Line::from(Span::styled(
            battle.text.row2.as_str(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let title = format!(" {} / {:?} ", battle.phase.as_str(), battle.stage);
    frame.render_widget(
        Paragraph::new(text).block(Block::default().title(title).borders(Borders::ALL)),
        chunks[2],
    );

    let mut lines = Vec::new();
    if let Some(capture) = &battle.capture {
        lines.push(Line::from(format!("{capture:?}")));
    }
    if battle.show_options {
        let options = if battle.forced_swap {
            "Your creature fainted! [s] Swap"
        } else {
            "[1-4] Attack  [i] Item  [s] Swap  [f] Flee"
        };
        lines.push(Line::from(Span::styled(
            options,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    }
    if battle.queued > 0 {
        lines.push(Line::from(format!("{} turn events queued", battle.queued)));
    }
    frame.render_widget(Paragraph::new(lines), chunks[3]);
}

fn render_tutorial(frame: &mut Frame, area: Rect, page: usize, row1: &str, row2: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(row1, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(row2),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to continue",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(format!(" Welcome ({}) ", page + 1))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta)),
        );
    frame.render_widget(paragraph, area);
}

fn render_dialogue(frame: &mut Frame, area: Rect, dialogue: &DialogueView) {
    let popup = centered_rect(60, 8, area);
    frame.render_widget(Clear, popup);

    let mut lines = Vec::new();
    if let Some(text) = &dialogue.text {
        lines.push(Line::from(text.as_str()));
    }
    for (i, option) in dialogue.options.iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!("[{}] {}", i + 1, option),
            Style::default().fg(Color::Yellow),
        )));
    }
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(format!(" {} ", dialogue.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(paragraph, popup);
}

fn render_chat(frame: &mut Frame, area: Rect, chat: &[String]) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = chat
        .iter()
        .skip(chat.len().saturating_sub(visible))
        .map(|line| ListItem::new(line.as_str()))
        .collect();
    let list = List::new(items).block(
        Block::default()
            .title(" Chat ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(list, area);
}

fn render_help(frame: &mut Frame, area: Rect, scene: &Scene) {
    let help = match scene {
        Scene::Battle(_) => "1-4 Attack  I Item  S Swap  F Flee  Enter Continue  Q Quit",
        Scene::Tutorial { .. } => "Enter Continue  Q Quit",
        _ => "Arrows Move  Enter Talk/Continue  1-4 Answer  W Wave  Q Quit",
    };
    let paragraph = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
