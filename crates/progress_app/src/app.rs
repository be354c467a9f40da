use std::io::BufRead;
use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use progress_core::{
    is_expandable, update_detail, update_list, DetailKey, DetailMsg, DetailState, Effect,
    GroupKind, ListMsg, ListState,
};
use progress_engine::{Clock, EngineHandle, ReqwestProgressSource, SessionContext};
use progress_logging::{progress_debug, progress_info, progress_warn};

use crate::cli::ViewArg;
use crate::commands::{self, Command, HELP};
use crate::config::AppConfig;
use crate::effects::{EffectRunner, Inbound, Navigation};
use crate::render;

// Throttles rendering and stdin polling.
const TICK: Duration = Duration::from_millis(75);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CollectionView {
    Dashboard,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run_app(config: AppConfig, view: Option<ViewArg>) -> anyhow::Result<()> {
    let session = match &config.token {
        Some(token) => SessionContext::with_token(token.clone()),
        None => {
            progress_warn!("No bearer token configured; requests will fail until one is set");
            SessionContext::new()
        }
    };
    let source = ReqwestProgressSource::new(config.source_settings(), session)?;
    let clock: Clock = Arc::new(|| Utc::now().to_rfc3339());
    let engine = EngineHandle::new(Arc::new(source), clock)?;

    let runner = EffectRunner::new(engine, config.detail_interval());
    let mut app = App::new(config, runner);
    app.start(view.unwrap_or(ViewArg::Dashboard));

    let lines = spawn_stdin_reader()?;
    app.event_loop(lines);
    progress_info!("Shutting down");
    Ok(())
}

fn spawn_stdin_reader() -> anyhow::Result<mpsc::Receiver<String>> {
    let (line_tx, line_rx) = mpsc::channel();
    thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if line_tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        progress_warn!("Stopped reading commands: {}", err);
                        break;
                    }
                }
            }
        })?;
    Ok(line_rx)
}

struct App {
    config: AppConfig,
    runner: EffectRunner,
    view: CollectionView,
    list: ListState,
    /// Present while the detail screen is shown.
    detail: Option<DetailState>,
    last_generation: u64,
    force_render: bool,
}

impl App {
    fn new(config: AppConfig, runner: EffectRunner) -> Self {
        let list = ListState::new(1, config.client_key.clone());
        Self {
            config,
            runner,
            view: CollectionView::Dashboard,
            list,
            detail: None,
            last_generation: 1,
            force_render: true,
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.last_generation += 1;
        self.last_generation
    }

    fn start(&mut self, view: ViewArg) {
        match view {
            ViewArg::Dashboard => self.show_collection(CollectionView::Dashboard),
            ViewArg::List => self.show_collection(CollectionView::List),
            ViewArg::Detail { filename } => {
                // `back` from a directly opened record lands on the list.
                self.view = CollectionView::List;
                let key = DetailKey::new(self.config.client_key.clone(), filename);
                self.open_detail(key);
            }
        }
    }

    fn event_loop(&mut self, lines: mpsc::Receiver<String>) {
        let mut commands_open = true;
        self.render();
        loop {
            while commands_open {
                match lines.try_recv() {
                    Ok(line) => {
                        if self.handle_line(&line) == Flow::Quit {
                            return;
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        progress_info!("stdin closed; still watching");
                        commands_open = false;
                    }
                }
            }

            if let Some(inbound) = self.runner.next_event(TICK) {
                self.dispatch_inbound(inbound);
                while let Some(inbound) = self.runner.try_next_event() {
                    self.dispatch_inbound(inbound);
                }
            }
            self.render();
        }
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        match commands::parse(line) {
            None => Flow::Continue,
            Some(Err(err)) => {
                println!("{err}");
                Flow::Continue
            }
            Some(Ok(command)) => self.handle_command(command),
        }
    }

    fn handle_command(&mut self, command: Command) -> Flow {
        let on_detail = self.detail.is_some();
        match command {
            Command::Quit => return Flow::Quit,
            Command::Help => println!("{HELP}"),
            Command::Refresh if on_detail => self.dispatch_detail(DetailMsg::RefreshClicked),
            Command::Refresh => self.dispatch_list(ListMsg::RefreshClicked),
            Command::Dismiss if on_detail => self.dispatch_detail(DetailMsg::ErrorDismissed),
            Command::Dismiss => self.dispatch_list(ListMsg::ErrorDismissed),
            Command::Back if on_detail => self.dispatch_detail(DetailMsg::BackClicked),
            Command::Expand { kind, index } if on_detail => self.set_expanded(kind, index, true),
            Command::Collapse { kind, index } if on_detail => {
                self.set_expanded(kind, index, false)
            }
            Command::Open(filename) if !on_detail => {
                self.dispatch_list(ListMsg::RecordOpened { filename })
            }
            Command::Search(text) if self.on_list() => {
                self.dispatch_list(ListMsg::SearchChanged(text))
            }
            Command::Filter(filter) if self.on_list() => {
                self.dispatch_list(ListMsg::FilterChanged(filter))
            }
            Command::Page(page) if self.on_list() => self.dispatch_list(ListMsg::PageChanged(page)),
            other => println!("`{}` is not available on this screen", command_name(&other)),
        }
        Flow::Continue
    }

    fn on_list(&self) -> bool {
        self.detail.is_none() && self.view == CollectionView::List
    }

    /// Expands or collapses one group; already-matching or single-line
    /// groups are left alone.
    fn set_expanded(&mut self, kind: GroupKind, index: usize, expanded: bool) {
        let Some(state) = &self.detail else {
            return;
        };
        let Some(record) = state.record() else {
            println!("No record loaded yet");
            return;
        };
        let groups = match kind {
            GroupKind::Errors => &record.errors,
            GroupKind::Warnings => &record.warnings,
        };
        let Some(group) = groups.get(index) else {
            println!("There is no {} group {}", kind.as_str(), index + 1);
            return;
        };
        if !is_expandable(group) {
            println!("{} group {} has a single line", kind.as_str(), index + 1);
            return;
        }
        if state.expansion().is_expanded(kind, index, group) != expanded {
            self.dispatch_detail(DetailMsg::GroupToggled { kind, index });
        }
    }

    fn dispatch_inbound(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::List(msg) => self.dispatch_list(msg),
            Inbound::Detail(msg) => self.dispatch_detail(msg),
        }
    }

    fn dispatch_list(&mut self, msg: ListMsg) {
        let state = std::mem::take(&mut self.list);
        let (state, effects) = update_list(state, msg);
        self.list = state;
        self.apply(effects);
    }

    fn dispatch_detail(&mut self, msg: DetailMsg) {
        let Some(state) = self.detail.take() else {
            progress_debug!("Dropping detail message without a detail screen");
            return;
        };
        let (state, effects) = update_detail(state, msg);
        self.detail = Some(state);
        self.apply(effects);
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for navigation in self.runner.apply(effects) {
            match navigation {
                Navigation::OpenDetail(key) => self.open_detail(key),
                Navigation::CloseDetail => self.close_detail(),
            }
        }
    }

    fn show_collection(&mut self, view: CollectionView) {
        self.view = view;
        let interval = match view {
            CollectionView::Dashboard => self.config.dashboard_interval(),
            CollectionView::List => self.config.list_interval(),
        };
        let generation = self.next_generation();
        self.dispatch_list(ListMsg::WatchStarted { generation });
        self.runner
            .watch_list(generation, self.list.client_key(), interval);
        self.force_render = true;
    }

    fn open_detail(&mut self, key: DetailKey) {
        self.runner.stop_list();
        let generation = self.next_generation();
        self.detail = Some(DetailState::default());
        self.dispatch_detail(DetailMsg::IdentityChanged { generation, key });
        self.force_render = true;
    }

    fn close_detail(&mut self) {
        self.runner.stop_detail();
        self.detail = None;
        self.show_collection(CollectionView::List);
    }

    fn render(&mut self) {
        let force = std::mem::take(&mut self.force_render);
        let text = match &mut self.detail {
            Some(detail) => {
                let dirty = detail.consume_dirty();
                (dirty || force).then(|| render::detail(&detail.view()))
            }
            None => {
                let dirty = self.list.consume_dirty();
                (dirty || force).then(|| match self.view {
                    CollectionView::Dashboard => render::dashboard(&self.list.dashboard()),
                    CollectionView::List => render::list(&self.list.view()),
                })
            }
        };
        if let Some(text) = text {
            println!("\n{text}");
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Search(_) => "search",
        Command::Filter(_) => "filter",
        Command::Page(_) => "page",
        Command::Expand { .. } => "expand",
        Command::Collapse { .. } => "collapse",
        Command::Open(_) => "open",
        Command::Back => "back",
        Command::Refresh => "refresh",
        Command::Dismiss => "dismiss",
        Command::Help => "help",
        Command::Quit => "quit",
    }
}
