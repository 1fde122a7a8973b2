mod config;
mod searchers;

use std::io::{self, BufRead};
use std::sync::Arc;

use anyhow::{Context, Result};
use chatter_autocomplete::{
    Autocompleter, CancelToken, Dispatch, ListPopover, StringBuffer, TextBuffer,
};
use chatter_toast::ToastManager;
use chatter_viewer::{DesktopHost, MediaKind, Viewer, ViewerHost};

type Completer = Autocompleter<StringBuffer, ListPopover>;

fn main() {
    env_logger::init();

    let app_config = config::AppConfig::load_or_create();
    if let Err(err) = run(app_config) {
        log::error!("chatter: {:#}", err);
        std::process::exit(1);
    }
}

fn run(app_config: config::AppConfig) -> Result<()> {
    let root = CancelToken::new();
    let mut completer: Completer =
        Autocompleter::new(root.clone(), StringBuffer::default(), ListPopover::new());
    completer.apply_options(&app_config.autocomplete);
    completer.use_searcher(Arc::new(searchers::MemberSearcher));
    completer.use_searcher(Arc::new(searchers::EmojiSearcher));
    completer.use_searcher(Arc::new(searchers::CommandSearcher));
    completer.add_selected_fn(searchers::apply_selection);

    let mut toasts = ToastManager::new();
    let mut host = DesktopHost::new();
    let mut viewer = None;

    println!("Type a message with an optional | cursor marker. Commands:");
    println!("  :down :up :select :clear :pause :unpause");
    println!("  :view <url> [image|gif|gifv|video]");
    println!("  :download :copy-url :open-original :close");

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if !handle_command(&line, &mut completer, &mut viewer, &mut host) {
            type_text(&mut completer, &line, app_config.autocomplete.dispatch);
        }

        toasts.tick();
        let shown = toasts.active().len();
        toasts.ingest_pending();
        for toast in &toasts.active()[shown..] {
            println!("[{:?}] {}", toast.kind, toast.message);
        }
    }

    root.cancel();
    Ok(())
}

fn type_text(completer: &mut Completer, marked: &str, dispatch: Dispatch) {
    *completer.buffer_mut() = StringBuffer::with_cursor_marker(marked);
    completer.autocomplete();
    if dispatch == Dispatch::Background {
        smol::block_on(completer.settle());
    }
    print_popover(completer);
}

/// Returns `false` when the line is plain text rather than a command.
fn handle_command<H: ViewerHost>(
    line: &str,
    completer: &mut Completer,
    viewer: &mut Option<Viewer>,
    host: &mut H,
) -> bool {
    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or("");
    match command {
        ":down" => {
            completer.move_down();
            print_popover(completer);
        }
        ":up" => {
            completer.move_up();
            print_popover(completer);
        }
        ":select" => {
            if completer.select() {
                print_buffer(completer);
            }
            print_popover(completer);
        }
        ":clear" => {
            if !completer.clear() {
                println!("(nothing to clear)");
            }
        }
        ":pause" => {
            completer.pause();
            println!("(paused)");
        }
        ":unpause" => {
            completer.unpause();
            println!("(unpaused)");
        }
        ":view" => {
            let Some(url) = words.next() else {
                println!("usage: :view <url> [image|gif|gifv|video]");
                return true;
            };
            let kind = parse_kind(words.next().unwrap_or("image"));
            *viewer = open_viewer(url, kind);
        }
        ":download" | ":copy-url" | ":open-original" | ":close" => {
            let Some(open) = viewer.as_mut() else {
                println!("(no viewer open)");
                return true;
            };
            let action = format!("embedviewer.{}", &command[1..]);
            open.activate_named(&action, host);
            if open.is_closed() {
                *viewer = None;
                println!("(viewer closed)");
            }
        }
        _ => return false,
    }
    true
}

fn parse_kind(value: &str) -> MediaKind {
    match value.to_ascii_lowercase().as_str() {
        "gif" => MediaKind::AnimatedImage,
        "gifv" => MediaKind::AnimatedVideo,
        "video" => MediaKind::Video,
        "audio" => MediaKind::Audio,
        "file" => MediaKind::File,
        _ => MediaKind::Image,
    }
}

fn open_viewer(url: &str, kind: MediaKind) -> Option<Viewer> {
    let viewer = match Viewer::new(url, kind) {
        Ok(viewer) => viewer,
        Err(err) => {
            println!("cannot open viewer: {}", err);
            return None;
        }
    };

    println!("{} ({:?})", viewer.title(), viewer.kind());
    let actions: Vec<String> = viewer
        .controls_start()
        .controls()
        .iter()
        .map(|control| match control.action {
            Some(action) => format!("{} [{}]", control.tooltip, action),
            None => control.tooltip.clone(),
        })
        .collect();
    println!("  controls: {}", actions.join(", "));
    Some(viewer)
}

fn print_buffer(completer: &Completer) {
    let buffer = completer.buffer();
    let text = buffer.as_string();
    let cursor: usize = text
        .chars()
        .take(buffer.cursor())
        .map(char::len_utf8)
        .sum();
    println!("buffer: {}|{}", &text[..cursor], &text[cursor..]);
}

fn print_popover(completer: &Completer) {
    if !completer.is_visible() {
        println!("(no suggestions)");
        return;
    }

    let selected = completer.selected_index();
    for (index, row) in completer.rows().into_iter().enumerate() {
        let marker = if selected == Some(index) { '>' } else { ' ' };
        match row.detail {
            Some(detail) => println!("{} {}  {}", marker, row.label, detail),
            None => println!("{} {}", marker, row.label),
        }
    }
}
