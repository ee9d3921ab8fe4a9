use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Instant;

use crossterm::event;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use quire::app::{UiTheme, Workbench};
use quire::core::event::InputEvent;
use quire::core::Command;
use quire::kernel::explorer::ProjectExplorer;
use quire::kernel::services::adapters::{
    ensure_settings_file, get_keys_path, get_recent_projects_path, load_hotkeys,
    load_recent_projects, load_settings, save_recent_projects, KeybindingService,
    LocalFileProvider,
};
use quire::kernel::services::ports::Settings;
use quire::kernel::{Action, AppState, Store};
use quire::models::{Project, RecentProjects, PROJECT_EXTENSION};
use quire::tui::terminal_guard::{self, TerminalGuard, TerminationSignal};

mod logging;

const USAGE: &str = "usage: quire [PATH]...\n\n\
    Opens each PATH in the editor. *.qproj files and folders holding one open as projects.";

/// 命令行参数解析成要打开的绝对路径
fn resolve_startup_paths(cwd: &Path, args: &[String]) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(args.len());
    for arg in args {
        let raw = PathBuf::from(arg);
        let path = if raw.is_absolute() { raw } else { cwd.join(raw) };
        let meta = std::fs::metadata(&path).map_err(|e| {
            io::Error::new(e.kind(), format!("{}: {e}", path.display()))
        })?;
        if meta.is_dir() {
            paths.push(find_project_descriptor(&path)?);
        } else {
            paths.push(path);
        }
    }
    Ok(paths)
}

/// 目录参数：取目录里的项目描述文件
fn find_project_descriptor(dir: &Path) -> io::Result<PathBuf> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_descriptor = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(PROJECT_EXTENSION));
        if is_descriptor && path.is_file() {
            found.push(path);
        }
    }
    found.sort();
    found.into_iter().next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{}: no .{PROJECT_EXTENSION} file in folder", dir.display()),
        )
    })
}

fn load_config() -> (Settings, KeybindingService) {
    let settings = match ensure_settings_file() {
        Ok(path) => load_settings(&path),
        Err(e) => {
            tracing::warn!(error = %e, "settings file unavailable, using defaults");
            Settings::default()
        }
    };

    let mut keybindings = KeybindingService::with_defaults();
    if let Some(path) = get_keys_path() {
        load_hotkeys(&mut keybindings, &path);
    }
    (settings, keybindings)
}

fn build_workbench(
    settings: Settings,
    keybindings: KeybindingService,
    log_rx: Option<mpsc::Receiver<String>>,
) -> Workbench {
    let recent = get_recent_projects_path()
        .map(|path| load_recent_projects(&path))
        .unwrap_or_else(RecentProjects::new);
    let theme = UiTheme::from_settings(&settings.theme);
    let explorer = ProjectExplorer::new(Box::new(LocalFileProvider::new()));
    let store = Store::new(AppState::new(explorer, settings, recent));
    Workbench::new(store, keybindings, theme, log_rx)
}

/// 上次的项目重新打开；已经不存在的描述文件跳过
fn restore_recent_projects(workbench: &mut Workbench) {
    let (existing, missing): (Vec<PathBuf>, Vec<PathBuf>) = workbench
        .store()
        .state()
        .recent
        .iter()
        .map(Path::to_path_buf)
        .partition(|path| path.is_file());
    for path in &missing {
        tracing::warn!(path = %path.display(), "recent project no longer exists");
    }
    if !existing.is_empty() {
        workbench.dispatch(Action::OpenPaths(existing));
    }
}

fn save_recent(workbench: &Workbench) {
    let Some(path) = get_recent_projects_path() else {
        return;
    };
    if let Err(e) = save_recent_projects(&path, &workbench.store().state().recent) {
        tracing::warn!(path = %path.display(), error = %e, "failed to save recent projects");
    }
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    workbench: &mut Workbench,
    signal_rx: &mpsc::Receiver<TerminationSignal>,
) -> io::Result<()> {
    let mut dirty = true;
    loop {
        if let Ok(signal) = signal_rx.try_recv() {
            tracing::info!(?signal, "exiting on signal");
            return Ok(());
        }

        if dirty {
            terminal.draw(|frame| {
                let area = frame.area();
                workbench.render(frame, area);
                if let Some((x, y)) = workbench.cursor_position() {
                    frame.set_cursor_position((x, y));
                }
            })?;
            dirty = false;
        }

        let timeout = workbench.poll_timeout(Instant::now());
        if event::poll(timeout)? {
            let input = InputEvent::from(event::read()?);
            dirty |= workbench.handle_input(&input);
            // 一次把积压的事件处理完再重绘
            while event::poll(std::time::Duration::ZERO)? {
                let input = InputEvent::from(event::read()?);
                dirty |= workbench.handle_input(&input);
            }
        }
        dirty |= workbench.tick(Instant::now());

        if workbench.should_quit() {
            return Ok(());
        }
    }
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return Ok(());
    }
    if args.iter().any(|a| a == "-V" || a == "--version") {
        println!("quire {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let cwd = std::env::current_dir()?;
    let startup = match resolve_startup_paths(&cwd, &args) {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("quire: {e}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    let mut logging = logging::init();
    let log_rx = logging.as_mut().and_then(|guard| guard.take_log_rx());

    let (settings, keybindings) = load_config();
    let mut workbench = build_workbench(settings, keybindings, log_rx);

    let (projects, documents): (Vec<&PathBuf>, Vec<&PathBuf>) =
        startup.iter().partition(|p| Project::is_project_file(p));
    let opens_document = !documents.is_empty();
    if projects.is_empty() {
        restore_recent_projects(&mut workbench);
    }
    if !startup.is_empty() {
        workbench.dispatch(Action::OpenPaths(startup));
    }
    if !opens_document {
        workbench.dispatch(Action::RunCommand(Command::NewFile));
    }

    let guard = TerminalGuard::new()?;
    terminal_guard::install_panic_restore(guard.restorer());
    let (signal_tx, signal_rx) = mpsc::channel();
    #[cfg(unix)]
    let _signal_thread = terminal_guard::install_termination_signals(guard.restorer(), signal_tx)
        .map_err(|e| tracing::warn!(error = %e, "signal handler unavailable"))
        .ok();
    #[cfg(not(unix))]
    let _signal_tx = signal_tx;

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;
    let result = run(&mut terminal, &mut workbench, &signal_rx);

    save_recent(&workbench);
    drop(guard);
    tracing::info!("quire exited");
    drop(logging);
    result
}

#[cfg(test)]
#[path = "../tests/unit/cli_startup_paths.rs"]
mod cli_startup_paths_tests;
