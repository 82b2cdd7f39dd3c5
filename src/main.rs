mod demo;

use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use clap::{Arg, ArgMatches, Command};
use indexmap::IndexMap;
use log::info;
use modelform::runtime::event::WidgetAction;
use modelform::terminal::{KeyCode, Terminal, TerminalEvent};
use modelform::ui::span::{Span, SpanLine};
use modelform::ui::style::Style;
use modelform::value::Value;
use modelform::{Form, FormBuilder, FormConfig};

use crate::demo::VoteCounter;

const IDLE_POLL: Duration = Duration::from_millis(100);

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(&cli().get_matches()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cli() -> Command {
    Command::new("modelform-demo")
        .about("Forms generated from model declarations")
        .arg(
            Arg::new("demo")
                .value_parser(["person", "poll"])
                .default_value("person")
                .help("Which demo form to open"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Form configuration (YAML, or JSON with a .json extension)"),
        )
}

fn load_config(path: Option<&String>) -> io::Result<FormConfig> {
    let Some(path) = path else {
        return Ok(FormConfig::new());
    };
    let raw = fs::read_to_string(path)?;
    let parsed = if Path::new(path).extension().is_some_and(|ext| ext == "json") {
        FormConfig::from_json_str(&raw)
    } else {
        FormConfig::from_yaml_str(&raw)
    };
    parsed.map_err(io::Error::other)
}

enum DemoKind {
    Person,
    Poll(VoteCounter),
}

struct Demo {
    form: Form,
    kind: DemoKind,
    submitted: Option<Value>,
    done: bool,
}

impl Demo {
    fn build(name: &str, config: FormConfig) -> io::Result<Self> {
        let (form, kind) = match name {
            "poll" => {
                let counter: VoteCounter = Arc::new(Mutex::new(IndexMap::new()));
                let sink = counter.clone();
                let form = FormBuilder::new(demo::poll())
                    .with_config(config.with_submit_label("Vote"))
                    .on_submit(move |event| demo::record_vote(&sink, &event.value))
                    .build();
                (form, DemoKind::Poll(counter))
            }
            _ => {
                let model = demo::person().map_err(io::Error::other)?;
                let form = FormBuilder::new(model)
                    .with_config(config)
                    .on_submit(|event| info!("submitted {}", event.value.to_json()))
                    .build();
                (form, DemoKind::Person)
            }
        };
        Ok(Self {
            form: form.map_err(io::Error::other)?,
            kind,
            submitted: None,
            done: false,
        })
    }

    fn on_submitted(&mut self, value: Value) {
        match &self.kind {
            DemoKind::Person => self.done = true,
            DemoKind::Poll(_) => self.form.set_submit_enabled(false),
        }
        self.submitted = Some(value);
    }

    fn lines(&self) -> Vec<SpanLine> {
        let mut lines = self.form.draw().lines;
        if let DemoKind::Poll(counter) = &self.kind
            && let Ok(votes) = counter.lock()
        {
            lines.push(Vec::new());
            for (language, count) in votes.iter() {
                lines.push(vec![Span::styled(format!("{language}: {count}"), Style::hint())]);
            }
        }
        lines.push(vec![Span::styled(
            "tab/↑↓ move · enter select · ctrl+c quit",
            Style::hint(),
        )]);
        lines
    }
}

fn run(matches: &ArgMatches) -> io::Result<()> {
    let config = load_config(matches.get_one::<String>("config"))?;
    let name = matches
        .get_one::<String>("demo")
        .map(String::as_str)
        .unwrap_or("person");
    let mut demo = Demo::build(name, config)?;

    let mut terminal = Terminal::new()?;
    terminal.enter_raw_mode()?;
    let result = event_loop(&mut terminal, &mut demo);
    terminal.exit_raw_mode()?;
    result?;

    if let Some(value) = &demo.submitted {
        let json = serde_json::to_string_pretty(&value.to_json()).map_err(io::Error::other)?;
        println!("{json}");
    }
    Ok(())
}

fn event_loop(terminal: &mut Terminal, demo: &mut Demo) -> io::Result<()> {
    let mut render_requested = true;

    loop {
        let timeout = demo.form.poll_timeout(Instant::now(), IDLE_POLL);
        if terminal.poll(timeout)? {
            match terminal.read_event()? {
                TerminalEvent::Key(key) if key.is_ctrl('c') => break,
                TerminalEvent::Key(key) => {
                    let result = demo.form.handle_key(key);
                    if !result.handled && key.code == KeyCode::Esc {
                        break;
                    }
                    for action in result.actions {
                        if let WidgetAction::Submitted { value } = action {
                            demo.on_submitted(value);
                        }
                    }
                    render_requested = true;
                }
                TerminalEvent::Resize { .. } => {
                    render_requested = true;
                }
            }
        }

        if demo.form.tick(Instant::now()) {
            render_requested = true;
        }

        if render_requested {
            terminal.render_frame(&demo.lines())?;
            render_requested = false;
        }

        if demo.done {
            break;
        }
    }

    Ok(())
}
