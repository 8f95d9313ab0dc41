//! Screen rendering
//!
//! Draws the dungeon view, sidebar and message log, plus whatever overlay
//! the current phase asks for. Rendering only reads the game.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::ecs::{ItemKind, ItemTag};
use crate::game::{Game, Overlay, StateMachine};
use crate::world::{Position, Tile};

use super::colors::Palette;

const SIDEBAR_WIDTH: u16 = 26;
const MESSAGE_HEIGHT: u16 = 8;

/// Halve an RGB color for remembered-but-unseen cells
fn dim(color: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(r / 2, g / 2, b / 2),
        _ => Color::DarkGray,
    }
}

/// Terminal front-end state
pub struct App {
    palette: Palette,
}

impl App {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn render(&self, frame: &mut Frame, game: &Game, machine: &StateMachine) {
        let area = frame.area();
        match machine.overlay() {
            Overlay::Setup {
                name,
                naming,
                classes,
                selected,
            } => {
                self.render_setup(frame, game, area, name, naming, classes, selected);
                return;
            }
            _ => self.render_playing(frame, game, area),
        }

        match machine.overlay() {
            Overlay::Inventory => self.render_inventory(frame, game, area),
            Overlay::Stats => self.render_stats(frame, game, area),
            Overlay::Help(text) => self.render_help(frame, text, area),
            Overlay::GameOver => self.render_banner(
                frame,
                area,
                " You Died ",
                "Your journey ends here.",
                "[r] restart   [q] quit",
                self.palette.color("ui_emphasis"),
            ),
            Overlay::Victory => self.render_banner(
                frame,
                area,
                " Victory ",
                "The guardian of this level has fallen.",
                "[c] continue   [q] quit",
                self.palette.color("ui_gold"),
            ),
            Overlay::None | Overlay::Setup { .. } => {}
        }
    }

    fn render_playing(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(SIDEBAR_WIDTH)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(MESSAGE_HEIGHT)])
            .split(columns[0]);

        self.render_map(frame, game, left[0]);
        self.render_messages(frame, game, left[1]);
        self.render_sidebar(frame, game, columns[1]);
    }

    fn render_map(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let border = self.palette.color(&game.level.wall_color);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} - Depth {} ", game.level.name, game.depth))
            .border_style(Style::default().fg(border));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let dungeon = &game.dungeon;
        let view_width = inner.width as i32;
        let view_height = inner.height as i32;

        // Center on the player, but never scroll past the map edges
        let center = game.registry.player_position().unwrap_or(Position::new(0, 0));
        let cam_x = (center.x - view_width / 2).clamp(0, (dungeon.width - view_width).max(0));
        let cam_y = (center.y - view_height / 2).clamp(0, (dungeon.height - view_height).max(0));

        let wall = self.palette.color(&game.level.wall_color);
        let floor = self.palette.color(&game.level.floor_color);

        let buf = frame.buffer_mut();
        for screen_y in 0..view_height {
            for screen_x in 0..view_width {
                let (map_x, map_y) = (cam_x + screen_x, cam_y + screen_y);
                if !dungeon.is_explored(map_x, map_y) {
                    continue;
                }
                let Some(tile) = dungeon.tile(map_x, map_y) else {
                    continue;
                };
                let base = match tile {
                    Tile::Wall => wall,
                    Tile::Floor => floor,
                };
                let fg = if dungeon.is_visible(map_x, map_y) { base } else { dim(base) };
                let cell = &mut buf[(inner.x + screen_x as u16, inner.y + screen_y as u16)];
                cell.set_char(tile.glyph());
                cell.set_fg(fg);
            }
        }

        // Items first so actors and projectiles draw over them
        let mut order: Vec<_> = game.registry.renderables.keys().copied().collect();
        order.sort_by_key(|id| {
            if game.registry.items.contains_key(id) {
                0
            } else if *id == game.registry.player_id {
                2
            } else {
                1
            }
        });

        for id in order {
            let (Some(pos), Some(look)) = (game.registry.positions.get(&id), game.registry.renderables.get(&id))
            else {
                continue;
            };
            if !dungeon.is_visible(pos.x, pos.y) {
                continue;
            }
            let (screen_x, screen_y) = (pos.x - cam_x, pos.y - cam_y);
            if screen_x < 0 || screen_y < 0 || screen_x >= view_width || screen_y >= view_height {
                continue;
            }
            let cell = &mut buf[(inner.x + screen_x as u16, inner.y + screen_y as u16)];
            cell.set_char(look.glyph);
            cell.set_fg(self.palette.color(&look.color));
            if id == game.registry.player_id {
                cell.set_style(Style::default().add_modifier(Modifier::BOLD));
            }
        }
    }

    fn render_messages(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Messages ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let shown = inner.height as usize;
        let skip = game.log.len().saturating_sub(shown);
        let lines: Vec<Line> = game
            .log
            .entries()
            .skip(skip)
            .map(|entry| Line::from(Span::styled(entry.text.clone(), Style::default().fg(self.palette.color(&entry.color)))))
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_sidebar(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Character ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text = self.palette.color("ui_text");
        let gold = self.palette.color("ui_gold");
        let mut lines = vec![
            Line::from(Span::styled(game.player_name.clone(), Style::default().fg(gold).add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(class_label(&game.player_class), Style::default().fg(text))),
            Line::from(""),
        ];

        if let Some(stats) = game.player_stats() {
            let hp_color = if stats.hp * 4 <= stats.max_hp {
                self.palette.color("ui_emphasis")
            } else {
                text
            };
            lines.push(Line::from(vec![
                Span::raw("HP   "),
                Span::styled(format!("{}/{}", stats.hp, stats.max_hp), Style::default().fg(hp_color)),
            ]));
            lines.push(Line::from(format!("MP   {}/{}", stats.mana, stats.max_mana)));
            lines.push(Line::from(format!("DMG  {}", stats.damage)));
            lines.push(Line::from(format!("LVL  {}", stats.level)));
            lines.push(Line::from(format!("XP   {}", stats.xp)));
            lines.push(Line::from(Span::styled(format!("Gold {}", stats.gold), Style::default().fg(gold))));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(format!("Items {}", game.inventory.len())));
        if let Some(spell) = &game.player_spell {
            lines.push(Line::from(format!("Spell {}", class_label(spell))));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("i inv  c stats  ? help", Style::default().fg(Color::DarkGray))));

        frame.render_widget(Paragraph::new(lines), inner);
    }

    #[allow(clippy::too_many_arguments)]
    fn render_setup(
        &self,
        frame: &mut Frame,
        game: &Game,
        area: Rect,
        name: &str,
        naming: bool,
        classes: &[String],
        selected: usize,
    ) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(MESSAGE_HEIGHT)])
            .split(area);

        let gold = self.palette.color("ui_gold");
        if naming {
            let block = Block::default()
                .borders(Borders::ALL)
                .title(" New Character ")
                .border_style(Style::default().fg(gold));
            let prompt = vec![
                Line::from(""),
                Line::from("Enter your name:"),
                Line::from(Span::styled(format!("> {}_", name), Style::default().fg(gold))),
            ];
            frame.render_widget(Paragraph::new(prompt).block(block).alignment(Alignment::Center), rows[0]);
        } else {
            let items: Vec<ListItem> = classes
                .iter()
                .enumerate()
                .map(|(i, class)| {
                    let label = class_label(class);
                    if i == selected {
                        ListItem::new(format!("> {}", label)).style(Style::default().fg(gold).add_modifier(Modifier::BOLD))
                    } else {
                        ListItem::new(format!("  {}", label))
                    }
                })
                .collect();
            let block = Block::default()
                .borders(Borders::ALL)
                .title(format!(" Choose a class, {} ", name))
                .border_style(Style::default().fg(gold));
            frame.render_widget(List::new(items).block(block), rows[0]);
        }

        self.render_messages(frame, game, rows[1]);
    }

    fn render_inventory(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let popup = centered_rect(50, 60, area);
        frame.render_widget(Clear, popup);

        let items: Vec<ListItem> = if game.inventory.is_empty() {
            vec![ListItem::new("  (empty)")]
        } else {
            game.inventory
                .iter()
                .take(9)
                .enumerate()
                .map(|(i, item)| ListItem::new(format!("{}. {} ({})", i + 1, item.name, item_detail(item))))
                .collect()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Inventory [1-9 use, i/Esc close] ")
            .border_style(Style::default().fg(self.palette.color("ui_gold")));
        frame.render_widget(List::new(items).block(block), popup);
    }

    fn render_stats(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let popup = centered_rect(40, 50, area);
        frame.render_widget(Clear, popup);

        let mut lines = vec![
            Line::from(format!("Name   {}", game.player_name)),
            Line::from(format!("Class  {}", class_label(&game.player_class))),
            Line::from(""),
        ];
        if let Some(stats) = game.player_stats() {
            lines.push(Line::from(format!("Level  {}", stats.level)));
            lines.push(Line::from(format!("XP     {}", stats.xp)));
            lines.push(Line::from(format!("HP     {}/{}", stats.hp, stats.max_hp)));
            lines.push(Line::from(format!("Mana   {}/{}", stats.mana, stats.max_mana)));
            lines.push(Line::from(format!("Damage {}", stats.damage)));
            lines.push(Line::from(format!("Sight  {}", stats.fov_range)));
            lines.push(Line::from(format!("Speed  {}", stats.action_delay)));
            lines.push(Line::from(format!("Gold   {}", stats.gold)));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Character [c/Esc close] ")
            .border_style(Style::default().fg(self.palette.color("ui_gold")));
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }

    fn render_help(&self, frame: &mut Frame, text: &str, area: Rect) {
        let popup = centered_rect(60, 60, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Help [?/Esc close] ")
            .border_style(Style::default().fg(self.palette.color("ui_text")));
        frame.render_widget(Paragraph::new(text.to_string()).block(block).wrap(Wrap { trim: false }), popup);
    }

    fn render_banner(&self, frame: &mut Frame, area: Rect, title: &str, body: &str, keys: &str, color: Color) {
        let popup = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(body.to_string(), Style::default().fg(color).add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from(keys.to_string()),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(Style::default().fg(color));
        frame.render_widget(Paragraph::new(lines).block(block).alignment(Alignment::Center), popup);
    }
}

/// Short description shown next to an inventory entry
fn item_detail(item: &ItemTag) -> String {
    match item.kind {
        ItemKind::Gold => format!("{} gold", item.value),
        ItemKind::Consumable => String::from("consumable"),
        ItemKind::Stairs => String::from("stairs"),
    }
}

/// Human label for a script path: `class/mage.lua` becomes `Mage`
fn class_label(path: &str) -> String {
    let stem = path
        .rsplit('/')
        .next()
        .unwrap_or(path)
        .trim_end_matches(".lua");
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Create a centered rect using percentage of the available area
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::tests::arena;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_class_label() {
        assert_eq!(class_label("class/mage.lua"), "Mage");
        assert_eq!(class_label("spells/fireball.lua"), "Fireball");
        assert_eq!(class_label(""), "");
    }

    #[test]
    fn test_dim_halves_rgb() {
        assert_eq!(dim(Color::Rgb(200, 100, 50)), Color::Rgb(100, 50, 25));
        assert_eq!(dim(Color::Red), Color::DarkGray);
    }

    #[test]
    fn test_item_detail_covers_every_kind() {
        let item = |kind, value| ItemTag {
            kind,
            value,
            name: String::from("x"),
            script: String::new(),
        };
        assert_eq!(item_detail(&item(ItemKind::Gold, 12)), "12 gold");
        assert_eq!(item_detail(&item(ItemKind::Consumable, 0)), "consumable");
        assert_eq!(item_detail(&item(ItemKind::Stairs, 0)), "stairs");
    }

    #[test]
    fn test_render_draws_player() {
        let game = arena();
        let machine = StateMachine::with_phase(crate::game::Phase::Dungeon(Default::default()));
        let app = App::new(Palette::default());

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.render(frame, &game, &machine)).unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains('@'));
        assert!(screen.contains("Ada"));
    }
}
