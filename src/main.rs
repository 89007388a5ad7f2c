use crossbeam_channel::{Receiver, Sender, TryRecvError};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use notes_quiz::{
    Action, ApiRequest, ApiResponse, App, Config, FontSet, HttpQuizService, PageSetup,
    PdfExporter, handle_key, logger, spawn_api_worker, ui,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::error::Error;
use std::io;
use std::sync::Arc;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    logger::init(&config.log_file)?;
    log::info!("Starting against {}", config.api_base_url);

    let service = Arc::new(HttpQuizService::new(&config.api_base_url));
    let (request_tx, request_rx) = crossbeam_channel::unbounded::<ApiRequest>();
    let (response_tx, response_rx) = crossbeam_channel::unbounded::<ApiResponse>();
    let worker = spawn_api_worker(service, response_tx, request_rx)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &config, &request_tx, &response_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    drop(request_tx);
    if worker.join().is_err() {
        log::warn!("API worker panicked");
    }
    log::info!("Exiting");

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &Config,
    request_tx: &Sender<ApiRequest>,
    response_rx: &Receiver<ApiResponse>,
) -> Result<(), Box<dyn Error>> {
    let mut app = App::new();
    let fonts = FontSet::discover(&config.pdf_fonts);
    if fonts.is_empty() {
        log::warn!("No TrueType font found; PDF export is limited to Latin-1 text");
    } else {
        log::info!("{} PDF font(s) available", fonts.len());
    }
    let exporter = PdfExporter::new(PageSetup::a4_portrait(), fonts);

    while !app.should_quit {
        loop {
            match response_rx.try_recv() {
                Ok(response) => app.handle_response(response),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("API worker stopped unexpectedly");
                    return Err("API worker stopped".into());
                }
            }
        }

        terminal.draw(|f| ui::draw(f, &app))?;

        if !event::poll(TICK)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match handle_key(&mut app, key) {
            Action::None => {}
            Action::Send(request) => {
                if request_tx.send(request).is_err() {
                    log::warn!("API worker is gone, request dropped");
                }
            }
            Action::ExportPdf => {
                app.export_pdf(&exporter, &config.export_path);
            }
            Action::Quit => break,
        }
    }

    Ok(())
}
