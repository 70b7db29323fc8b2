//! TUI 设施布局编辑器演示
//!
//! 使用 crossterm 和 ratatui 构建的终端座位/设施布局编辑器
//!
//! # 用法
//!
//! ```bash
//! cargo run -p tui-layout-editor -- <layout.json>
//! ```
//!
//! 文件存在时加载（并校验）布局，否则按配置的默认网格大小新建。
//!
//! # 环境变量
//!
//! - `LAYOUT_EDITOR_CONFIG`: 编辑器配置 JSON 文件路径（可选）
//! - `LAYOUT_EDITOR_LOG`: 日志文件路径（可选；未设置时不输出日志，终端由 ratatui 占用）
//! - `RUST_LOG`: 日志过滤（默认 `tui_layout_editor=info,layout_editor_core=info`）
//!
//! # 快捷键
//!
//! - 方向键: 移动光标
//! - Shift+方向键: 矩形选择
//! - Space: 切换当前格的选中状态
//! - a: 全选 / Esc: 取消选择
//! - s / o / p: 放置座位 / 物体 / 空位
//! - Delete/Backspace: 删除
//! - n / Enter: 重命名光标处对象
//! - r: 切换可预约
//! - 1-4: 座位状态（可用/使用中/已预约/停用）
//! - f: 空格子填充为空位
//! - + / -: 扩大 / 缩小网格
//! - Ctrl+Z / Ctrl+Y: 撤销 / 重做
//! - Ctrl+S: 保存文件
//! - Ctrl+X: 退出

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use layout_editor_core::{
    Command, CommandResult, CursorCommand, EditorConfig, EditorStateManager, FacilityLayout,
    GridCell, GridSize, HistoryCommand, LayoutCommand, NamingSession, ObjectKind, SeatStatus,
    clip_label, grid::letter_label,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env, fs,
    io::{self, stdout},
    path::{Path, PathBuf},
    process,
};
use tracing_appender::non_blocking::WorkerGuard;
use unicode_width::UnicodeWidthStr;

/// 每个格子占用的终端列数（含右侧分隔空格）
const CELL_WIDTH: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Naming,
}

/// 应用状态
struct App {
    /// 状态管理器
    state_manager: EditorStateManager,
    /// 文件路径
    file_path: PathBuf,
    /// 是否需要退出
    should_quit: bool,
    /// 确认退出模式（如果有未保存修改）
    confirm_quit: bool,
    /// 状态消息
    status_message: String,
    /// 重命名流程
    naming: NamingSession,
    /// 输入模式
    input_mode: InputMode,
}

impl App {
    /// 创建新应用
    fn new(file_path: PathBuf, config: &EditorConfig) -> io::Result<Self> {
        let (layout, status_message) = if file_path.exists() {
            let json = fs::read_to_string(&file_path)?;
            let layout = FacilityLayout::from_json(&json).map_err(io::Error::other)?;
            let message = format!("已加载: {}", file_path.display());
            (layout, message)
        } else {
            let name = file_path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("layout")
                .to_string();
            let layout = FacilityLayout::new(
                name,
                config.default_category.clone(),
                config.default_grid_size,
            )
            .map_err(io::Error::other)?
            .with_cell_size(config.cell_size);
            (layout, format!("新建布局: {}", file_path.display()))
        };

        tracing::info!(path = %file_path.display(), id = %layout.id, "editor started");

        Ok(Self {
            state_manager: EditorStateManager::new(layout, config),
            file_path,
            should_quit: false,
            confirm_quit: false,
            status_message,
            naming: NamingSession::new(),
            input_mode: InputMode::Normal,
        })
    }

    /// 处理按键事件
    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // 确认退出模式
        if self.confirm_quit {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    if let Err(e) = self.save_file() {
                        self.status_message = format!("保存失败: {}", e);
                        self.confirm_quit = false;
                    } else {
                        self.should_quit = true;
                    }
                }
                KeyCode::Char('n') | KeyCode::Char('N') => {
                    self.should_quit = true;
                }
                KeyCode::Esc => {
                    self.confirm_quit = false;
                    self.status_message.clear();
                }
                _ => {}
            }
            return;
        }

        if self.input_mode == InputMode::Naming {
            self.handle_naming_key(key);
            return;
        }

        self.status_message.clear();

        match (key.modifiers, key.code) {
            // Ctrl+S: 保存
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
                if let Err(e) = self.save_file() {
                    self.status_message = format!("保存失败: {}", e);
                } else {
                    self.status_message = format!("已保存: {}", self.file_path.display());
                }
            }

            // Ctrl+X: 退出
            (KeyModifiers::CONTROL, KeyCode::Char('x')) => {
                if self.state_manager.is_modified() {
                    self.confirm_quit = true;
                    self.status_message = "布局已修改。保存吗? (y/n)".to_string();
                } else {
                    self.should_quit = true;
                }
            }

            // Ctrl+Z: 撤销
            (KeyModifiers::CONTROL, KeyCode::Char('z')) => {
                self.undo();
            }

            // Ctrl+Y: 重做
            (KeyModifiers::CONTROL, KeyCode::Char('y')) => {
                self.redo();
            }

            // Shift+方向键: 矩形选择
            (mods, KeyCode::Left) if mods.contains(KeyModifiers::SHIFT) => {
                self.extend_selection(-1, 0);
            }
            (mods, KeyCode::Right) if mods.contains(KeyModifiers::SHIFT) => {
                self.extend_selection(1, 0);
            }
            (mods, KeyCode::Up) if mods.contains(KeyModifiers::SHIFT) => {
                self.extend_selection(0, -1);
            }
            (mods, KeyCode::Down) if mods.contains(KeyModifiers::SHIFT) => {
                self.extend_selection(0, 1);
            }

            // 方向键移动
            (_, KeyCode::Left) => self.move_cursor(-1, 0),
            (_, KeyCode::Right) => self.move_cursor(1, 0),
            (_, KeyCode::Up) => self.move_cursor(0, -1),
            (_, KeyCode::Down) => self.move_cursor(0, 1),

            // 选择
            (_, KeyCode::Char(' ')) => {
                let position = self.state_manager.selection().current_position();
                self.execute(Command::Cursor(CursorCommand::ToggleCell { position }));
            }
            (_, KeyCode::Char('a')) => {
                self.execute(Command::Cursor(CursorCommand::SelectAll));
            }
            (_, KeyCode::Esc) => {
                self.execute(Command::Cursor(CursorCommand::ClearSelection));
            }

            // 放置
            (_, KeyCode::Char('s')) => self.place(ObjectKind::Seat),
            (_, KeyCode::Char('o')) => self.place(ObjectKind::Object),
            (_, KeyCode::Char('p')) => self.place(ObjectKind::Space),

            // 删除
            (_, KeyCode::Delete) | (_, KeyCode::Backspace) => self.delete(),

            // 重命名
            (_, KeyCode::Char('n')) | (_, KeyCode::Enter) => self.start_naming(),

            // 座位属性
            (_, KeyCode::Char('r')) => self.toggle_reservable(),
            (_, KeyCode::Char(c @ '1'..='4')) => {
                let index = c as usize - '1' as usize;
                self.set_seat_status(SeatStatus::ALL[index]);
            }

            // 填充 / 调整网格大小
            (_, KeyCode::Char('f')) => {
                self.execute_layout(LayoutCommand::FillEmptyWithSpaces, "已填充空位");
            }
            (_, KeyCode::Char('+')) | (_, KeyCode::Char('=')) => self.resize_by(1),
            (_, KeyCode::Char('-')) => self.resize_by(-1),

            _ => {}
        }
    }

    /// 重命名模式下的按键处理
    fn handle_naming_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                match self.naming.commit(&mut self.state_manager) {
                    Ok(CommandResult::Unchanged) => {
                        self.status_message = "名称未修改".to_string();
                    }
                    Ok(_) => {
                        self.status_message = "已重命名".to_string();
                    }
                    Err(err) => {
                        self.status_message = format!("重命名失败: {}", err);
                    }
                }
            }
            KeyCode::Esc => {
                self.naming.cancel_edit();
                self.input_mode = InputMode::Normal;
                self.status_message = "已取消重命名".to_string();
            }
            KeyCode::Backspace => self.naming.backspace(),
            KeyCode::Char(c) => self.naming.insert_char(c),
            _ => {}
        }
    }

    fn execute(&mut self, command: Command) -> Option<CommandResult> {
        match self.state_manager.execute(command) {
            Ok(result) => Some(result),
            Err(err) => {
                self.status_message = format!("命令失败: {}", err);
                None
            }
        }
    }

    fn execute_layout(&mut self, command: LayoutCommand, done_message: &str) {
        match self.execute(Command::Layout(command)) {
            Some(CommandResult::Unchanged) => {
                self.status_message = "无变化".to_string();
            }
            Some(_) => {
                self.status_message = done_message.to_string();
            }
            None => {}
        }
    }

    fn move_cursor(&mut self, dx: i32, dy: i32) {
        self.execute(Command::Cursor(CursorCommand::MoveBy { dx, dy }));
    }

    fn extend_selection(&mut self, dx: i32, dy: i32) {
        self.execute(Command::Cursor(CursorCommand::ExtendSelection { dx, dy }));
    }

    fn place(&mut self, kind: ObjectKind) {
        if let Some(CommandResult::Placed { object_ids }) =
            self.execute(Command::Layout(LayoutCommand::Place { kind }))
        {
            self.status_message = format!("已放置 {} 个{}", object_ids.len(), kind_label(kind));
        }
    }

    fn delete(&mut self) {
        match self.execute(Command::Layout(LayoutCommand::Delete)) {
            Some(CommandResult::Removed { count }) => {
                self.status_message = format!("已删除 {} 个对象", count);
            }
            Some(_) => {
                self.status_message = "没有可删除的对象".to_string();
            }
            None => {}
        }
    }

    fn start_naming(&mut self) {
        let position = self.state_manager.selection().current_position();
        if self.naming.start_editing(self.state_manager.layout(), position) {
            self.input_mode = InputMode::Naming;
        } else {
            self.status_message = "光标处没有可命名的对象".to_string();
        }
    }

    fn toggle_reservable(&mut self) {
        let reservable = self
            .state_manager
            .executor()
            .object_at_cursor()
            .and_then(|object| object.as_seat())
            .map(|seat| !seat.reservable)
            .unwrap_or(true);
        let message = if reservable {
            "已设为可预约"
        } else {
            "已设为不可预约"
        };
        self.execute_layout(LayoutCommand::SetSeatReservable { reservable }, message);
    }

    fn set_seat_status(&mut self, status: SeatStatus) {
        let message = format!("座位状态: {}", status_label(status));
        self.execute_layout(LayoutCommand::SetSeatStatus { status }, &message);
    }

    fn resize_by(&mut self, delta: i32) {
        let size = self.state_manager.layout().grid_size;
        let grow = |value: u32| (i64::from(value) + i64::from(delta)).max(0) as u32;
        let size = GridSize::new(grow(size.width), grow(size.height));
        let message = format!("网格大小: {}", size);
        self.execute_layout(LayoutCommand::Resize { size }, &message);
    }

    /// 撤销操作
    fn undo(&mut self) {
        if !self.state_manager.get_undo_redo_state().can_undo {
            self.status_message = "无可撤销操作".to_string();
            return;
        }
        if self.execute(Command::History(HistoryCommand::Undo)).is_some() {
            self.status_message = "已撤销".to_string();
        }
    }

    /// 重做操作
    fn redo(&mut self) {
        if !self.state_manager.get_undo_redo_state().can_redo {
            self.status_message = "无可重做操作".to_string();
            return;
        }
        if self.execute(Command::History(HistoryCommand::Redo)).is_some() {
            self.status_message = "已重做".to_string();
        }
    }

    fn save_file(&mut self) -> io::Result<()> {
        let json = self
            .state_manager
            .layout()
            .to_json_pretty()
            .map_err(io::Error::other)?;
        fs::write(&self.file_path, json)?;
        self.state_manager.mark_saved();
        tracing::info!(path = %self.file_path.display(), "layout saved");
        Ok(())
    }

    /// 渲染 UI
    fn render(&self, frame: &mut Frame) {
        let size = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // 编辑区域
                Constraint::Length(1), // 状态行
                Constraint::Length(1), // 快捷键提示
            ])
            .split(size);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(32)])
            .split(chunks[0]);

        self.render_grid(frame, body[0]);
        self.render_side_panel(frame, body[1]);
        self.render_status_line(frame, chunks[1]);
        self.render_shortcuts(frame, chunks[2]);
    }

    fn render_grid(&self, frame: &mut Frame, area: Rect) {
        let layout = self.state_manager.layout();
        let grid = self.state_manager.snapshot();

        let mut lines: Vec<Line> = Vec::with_capacity(grid.rows.len() + 1);

        // 列号
        let mut header = vec![Span::raw("    ")];
        for x in 0..grid.grid_size.width {
            header.push(Span::styled(
                format!("{:<width$}", x + 1, width = CELL_WIDTH),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(header));

        for row in &grid.rows {
            let mut spans = vec![Span::styled(
                format!("{:>3} ", letter_label(row.y as usize)),
                Style::default().fg(Color::DarkGray),
            )];
            for cell in &row.cells {
                spans.push(Span::styled(cell_text(cell), cell_style(cell)));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }

        let title = format!(
            " {} [{}] {}{} ",
            layout.name,
            layout.category,
            layout.grid_size,
            if self.state_manager.is_modified() {
                " *"
            } else {
                ""
            }
        );
        let paragraph =
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
    }

    fn render_side_panel(&self, frame: &mut Frame, area: Rect) {
        let state = self.state_manager.get_full_state();
        let summary = &state.layout.summary;

        let mut lines = vec![
            Line::from(format!("座位: {}", summary.seat_count)),
            Line::from(format!("  可预约: {}", summary.reservable_seat_count)),
        ];
        for status in SeatStatus::ALL {
            lines.push(Line::from(format!(
                "  {}: {}",
                status_label(status),
                summary.seats_with_status(status)
            )));
        }
        lines.push(Line::from(format!("物体: {}", summary.object_count)));
        lines.push(Line::from(format!("空位: {}", summary.space_count)));
        lines.push(Line::from(format!("空格子: {}", summary.empty_cell_count)));
        lines.push(Line::from(""));

        let cursor = &state.cursor;
        lines.push(Line::from(format!(
            "光标: {}{}",
            letter_label(cursor.position.y as usize),
            cursor.position.x + 1
        )));
        lines.push(Line::from(format!("已选: {}", cursor.selected_cells.len())));
        match &cursor.object {
            Some(object) => {
                lines.push(Line::from(format!("类型: {}", kind_label(object.kind()))));
                if let Some(name) = object.name() {
                    lines.push(Line::from(format!("名称: {}", name)));
                }
                if let Some(seat) = object.as_seat() {
                    lines.push(Line::from(format!("状态: {}", status_label(seat.status))));
                    lines.push(Line::from(format!(
                        "可预约: {}",
                        if seat.reservable { "是" } else { "否" }
                    )));
                }
            }
            None => lines.push(Line::from("（空）")),
        }
        lines.push(Line::from(""));
        lines.push(Line::from(format!(
            "撤销: {}  重做: {}",
            state.undo_redo.undo_depth, state.undo_redo.redo_depth
        )));

        let paragraph =
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" 信息 "));
        frame.render_widget(paragraph, area);
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let status_text = if self.input_mode == InputMode::Naming {
            format!(
                "重命名 [{}] > {}  (Enter=保存, Esc=取消)",
                self.naming.current_object_name(self.state_manager.layout()),
                self.naming.input()
            )
        } else if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            let state = self.state_manager.get_layout_state();
            format!(
                "{} | 对象:{} | 版本:{}",
                self.file_path.display(),
                self.state_manager.layout().objects.len(),
                state.version
            )
        };

        let status_line = Paragraph::new(status_text).style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

        frame.render_widget(status_line, area);
    }

    /// 渲染快捷键提示
    fn render_shortcuts(&self, frame: &mut Frame, area: Rect) {
        let shortcuts = if self.confirm_quit {
            "Y:保存并退出  N:不保存退出  Esc:取消"
        } else if self.input_mode == InputMode::Naming {
            "Enter:保存  Esc:取消  Backspace:删除字符"
        } else {
            "s/o/p:座位/物体/空位  Del:删除  n:重命名  r:预约  1-4:状态  f:填充  +/-:网格  Space/Shift-方向键:选择  Ctrl-Z/Y:撤销/重做  Ctrl-S:保存  Ctrl-X:退出"
        };

        let shortcuts_line =
            Paragraph::new(shortcuts).style(Style::default().bg(Color::Blue).fg(Color::White));

        frame.render_widget(shortcuts_line, area);
    }
}

fn kind_label(kind: ObjectKind) -> &'static str {
    match kind {
        ObjectKind::Seat => "座位",
        ObjectKind::Space => "空位",
        ObjectKind::Object => "物体",
    }
}

fn status_label(status: SeatStatus) -> &'static str {
    match status {
        SeatStatus::Available => "可用",
        SeatStatus::Occupied => "使用中",
        SeatStatus::Reserved => "已预约",
        SeatStatus::Disabled => "停用",
    }
}

fn cell_text(cell: &GridCell) -> String {
    let label = match cell.kind {
        Some(ObjectKind::Seat) | Some(ObjectKind::Object) => clip_label(&cell.label, CELL_WIDTH - 1),
        Some(ObjectKind::Space) | None => cell.symbol().to_string(),
    };
    // 宽字符按两列计算
    let width = label.width();
    format!("{}{}", label, " ".repeat((CELL_WIDTH - 1).saturating_sub(width)))
}

fn cell_style(cell: &GridCell) -> Style {
    let mut style = match (cell.kind, cell.status) {
        (Some(ObjectKind::Seat), Some(SeatStatus::Available)) => Style::default().fg(Color::Green),
        (Some(ObjectKind::Seat), Some(SeatStatus::Occupied)) => Style::default().fg(Color::Red),
        (Some(ObjectKind::Seat), Some(SeatStatus::Reserved)) => Style::default().fg(Color::Yellow),
        (Some(ObjectKind::Seat), _) => Style::default().fg(Color::DarkGray),
        (Some(ObjectKind::Object), _) => Style::default().fg(Color::Cyan),
        (Some(ObjectKind::Space), _) | (None, _) => Style::default().fg(Color::Gray),
    };

    if cell.reservable {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if cell.is_selected {
        style = style.bg(Color::Blue);
    }
    if cell.is_cursor {
        style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
    }
    style
}

/// 初始化日志（写入文件；终端由 TUI 占用）
fn init_logging() -> io::Result<Option<WorkerGuard>> {
    let Some(log_path) = env::var_os("LAYOUT_EDITOR_LOG").map(PathBuf::from) else {
        return Ok(None);
    };

    let directory = log_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_path
        .file_name()
        .ok_or_else(|| io::Error::other("LAYOUT_EDITOR_LOG 必须是文件路径"))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tui_layout_editor=info,layout_editor_core=info".into()),
        )
        .init();

    Ok(Some(guard))
}

fn load_config() -> io::Result<EditorConfig> {
    match env::var_os("LAYOUT_EDITOR_CONFIG") {
        Some(path) => EditorConfig::load(PathBuf::from(path)).map_err(io::Error::other),
        None => Ok(EditorConfig::default()),
    }
}

fn main() -> io::Result<()> {
    // 获取命令行参数
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("用法: {} <layout.json>", args[0]);
        eprintln!("\n示例:");
        eprintln!("  {} hall.json", args[0]);
        process::exit(1);
    }

    let file_path = PathBuf::from(&args[1]);

    let _log_guard = init_logging()?;
    let config = load_config()?;

    // 在进入原始模式前创建应用，加载失败时直接报错
    let mut app = App::new(file_path, &config)?;

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(%err, "editor terminated");
        eprintln!("错误: {}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if app.should_quit {
            break;
        }

        // 处理事件
        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    app.handle_key_event(key);
                }
                Event::Resize(_, _) => {
                    // 重新渲染
                }
                _ => {}
            }
        }
    }

    Ok(())
}
