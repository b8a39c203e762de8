//! Carve Playground - replay keystrokes against an HTML fragment
//!
//! ```text
//! carve-playground [--config config.json] [--caret N] <html | @file> [key ...]
//! ```
//!
//! Keys are single characters or DOM key names (`Backspace`, `Tab`); prefix
//! with `Shift+` for a shifted key. Prints the resulting HTML and caret as JSON.

use anyhow::{Context, Result, bail};
use carve_editor::{Config, Editor, Key, KeyEvent};
use serde::Serialize;

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    caret: Option<usize>,
    html: String,
    keys: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Report {
    html: String,
    text: String,
    caret: Option<usize>,
    history: usize,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut html = None;
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => args.config = Some(iter.next().context("--config needs a path")?),
            "--caret" => {
                let value = iter.next().context("--caret needs a position")?;
                args.caret = Some(value.parse().with_context(|| format!("invalid caret {value}"))?);
            }
            _ if html.is_none() => html = Some(arg),
            _ => args.keys.push(arg),
        }
    }
    let Some(html) = html else {
        bail!("usage: carve-playground [--config FILE] [--caret N] <html | @file> [key ...]");
    };
    args.html = match html.strip_prefix('@') {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?
        }
        None => html,
    };
    Ok(args)
}

fn load_config(path: Option<&str>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid config {path}"))
}

fn key_event(name: &str) -> KeyEvent {
    match name.strip_prefix("Shift+") {
        Some(key) => KeyEvent::key_down(Key::from_dom_key(key)).with_shift(),
        None => KeyEvent::key_down(Key::from_dom_key(name)),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let config = load_config(args.config.as_deref())?;
    tracing::debug!("Using config {:?}", config);

    let mut editor = Editor::from_html(&args.html, config).context("failed to load content")?;
    let caret = args
        .caret
        .unwrap_or_else(|| editor.controller().text_content().chars().count());
    editor.controller_mut().set_current_position(caret)?;

    smol::block_on(async {
        for name in &args.keys {
            let event = key_event(name);
            let response = editor
                .handle_event(&event)
                .await
                .with_context(|| format!("key {name} failed"))?;
            tracing::info!("{} -> {:?}", name, response);
        }
        Ok::<_, anyhow::Error>(())
    })?;

    let controller = editor.controller();
    let report = Report {
        html: controller.inner_html(),
        text: controller.text_content(),
        caret: controller.current_position(),
        history: controller.history().len(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_event() {
        assert_eq!(key_event("Backspace"), KeyEvent::key_down(Key::Backspace));
        assert_eq!(key_event("Shift+Tab"), KeyEvent::key_down(Key::Tab).with_shift());
        assert_eq!(key_event("x"), KeyEvent::key_down(Key::Char('x')));
    }
}
