mod config;

use crate::config::CONFIG;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use poi::*;
use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_millis(50);

fn main() {
    log::set_max_level(CONFIG.general.log_level.to_level_filter());
    pretty_env_logger::init();

    let geocoder: Arc<dyn Geocoder> = Arc::new(Nominatim::new(
        CONFIG.geocoder.endpoint.clone(),
        CONFIG.geocoder.user_agent.clone(),
    ));
    let locator = IpLocate::new(
        CONFIG.locate.endpoint.clone(),
        CONFIG.geocoder.user_agent.clone(),
    );

    let mut app_state = AppState::new(
        geocoder,
        Duration::from_millis(CONFIG.search.debounce_ms),
        Duration::from_millis(CONFIG.search.keyword_pause_ms),
        Some(CONFIG.session.file.clone().into()),
    );
    app_state.restore_session(Instant::now());

    let commands = spawn_input_reader();
    print_help();

    loop {
        match commands.recv_timeout(TICK) {
            Ok(line) => {
                if !handle_command(&mut app_state, &locator, &line) {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if app_state.tick(Instant::now()) {
            print_map(&app_state);
        }
    }
}

/// Feed stdin lines into the event loop without blocking it.
fn spawn_input_reader() -> Receiver<String> {
    let (tx, rx) = bounded(16);
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::error!("Failed to read from stdin. Reason:\r\n{}", e);
                    break;
                }
            }
        }
    });
    rx
}

fn handle_command(app_state: &mut AppState, locator: &dyn PositionProvider, line: &str) -> bool {
    let line = line.trim();
    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "quit" | "exit" => return false,
        "search" => {
            let mut input = app_state.input.clone();
            input.query = rest.to_string();
            app_state.handle_input(input, Instant::now());
        }
        "category" => {
            let category = if rest.is_empty() {
                Ok(None)
            } else {
                rest.parse::<Category>().map(Some)
            };
            match category {
                Ok(category) => {
                    let mut input = app_state.input.clone();
                    input.category = category;
                    app_state.handle_input(input, Instant::now());
                }
                Err(e) => println!("{}", e),
            }
        }
        "local" => {
            app_state.run_local_search(rest);
            print_map(app_state);
        }
        "locate" => {
            if app_state.locate(locator) {
                print_map(app_state);
            } else {
                println!("Position unavailable.");
            }
        }
        "show" => print_map(app_state),
        "help" => print_help(),
        _ => println!("Unknown command {:?}. Type `help` for a list.", command),
    }

    true
}

fn print_map(app_state: &AppState) {
    println!(
        "View: center {} at zoom {:.1}",
        app_state.view.center, app_state.view.zoom
    );
    for marker in app_state.position_layer.markers() {
        println!("  * {} [{}]", marker.popup_label(), marker.position);
    }
    println!("{} marker(s):", app_state.results.len());
    for marker in app_state.results.markers() {
        println!("  - {} [{}]", marker.popup_label(), marker.position);
    }
}

fn print_help() {
    println!("Commands:");
    println!("  search <text>      set the search text (empty to clear)");
    println!("  category <name>    set the category filter (empty to clear)");
    println!("                     one of Park, Monument, Seaside, Religious, Palace, Fort");
    println!("  local <text>       search the built-in landmarks only");
    println!("  locate             center the map on your position");
    println!("  show               print the current map state");
    println!("  quit               leave");
}
