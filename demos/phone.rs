//!
//! Phone number field in the terminal.
//!
//! Tab toggles the focus, Ctrl+Q or Esc quits.
//!

#![allow(unreachable_pub)]

use crossterm::cursor::MoveTo;
use crossterm::event::{read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use log::debug;
use rat_inputmask::event::{ConsumedEvent, FieldEvent, MaskOutcome};
use rat_inputmask::{handle_events, InputMaskState, LocalField, MaskElement, MaskOptions};
use std::fs;
use std::io::{stdout, Write};
use std::path::PathBuf;

const LABEL: &str = "phone: ";

fn main() -> Result<(), anyhow::Error> {
    setup_logging()?;

    let field = LocalField::new()
        .with_attribute("data-mdb-input-mask", "(999) 999-9999")
        .with_attribute("data-mdb-mask-placeholder", "true");
    let mut state = InputMaskState::attach(field, MaskOptions::new())?;
    state.add_listener(|n| debug!("notify {:?}", n));

    let mut data = Data {
        focused: false,
        last: MaskOutcome::Continue,
    };

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let r = run(&mut state, &mut data);

    execute!(stdout(), LeaveAlternateScreen)?;
    disable_raw_mode()?;

    r?;
    println!("{}", state.value());
    Ok(())
}

struct Data {
    focused: bool,
    last: MaskOutcome,
}

fn run(state: &mut InputMaskState<LocalField>, data: &mut Data) -> Result<(), anyhow::Error> {
    loop {
        repaint(state, data)?;

        let event = read()?;
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            continue;
        };

        data.last = match code {
            KeyCode::Esc => break,
            KeyCode::Char('q') if modifiers.contains(KeyModifiers::CONTROL) => break,
            KeyCode::Tab => {
                data.focused = !data.focused;
                if data.focused {
                    // the host is done with the focus change.
                    handle_events(state, &FieldEvent::Focus)
                        .and(|| state.run_deferred().into())
                } else {
                    handle_events(state, &FieldEvent::Blur)
                }
            }
            _ if !data.focused => MaskOutcome::Continue,
            KeyCode::Char(c) => edit(state, |f| f.type_char(c)),
            KeyCode::Backspace => edit(state, |f| f.backspace()),
            KeyCode::Delete => edit(state, |f| f.delete()),
            KeyCode::Left => move_caret(state, |c, _| c.saturating_sub(1)),
            KeyCode::Right => move_caret(state, |c, len| (c + 1).min(len)),
            KeyCode::Home => move_caret(state, |_, _| 0),
            KeyCode::End => move_caret(state, |_, len| len),
            _ => MaskOutcome::Continue,
        };
    }
    Ok(())
}

fn edit(state: &mut InputMaskState<LocalField>, f: impl FnOnce(&mut LocalField)) -> MaskOutcome {
    if let Some(field) = state.element_mut() {
        f(field);
    }
    handle_events(state, &FieldEvent::Input)
}

fn move_caret(
    state: &mut InputMaskState<LocalField>,
    f: impl FnOnce(u32, u32) -> u32,
) -> MaskOutcome {
    match state.element_mut() {
        Some(field) => {
            let pos = f(field.caret(), field.len());
            field.set_caret(pos);
            MaskOutcome::Changed
        }
        None => MaskOutcome::Continue,
    }
}

fn repaint(state: &InputMaskState<LocalField>, data: &Data) -> Result<(), anyhow::Error> {
    let Some(field) = state.element() else {
        return Ok(());
    };

    let mut out = stdout();
    queue!(out, Clear(ClearType::All))?;

    let shown = if field.value().is_empty() && !data.focused {
        field.placeholder().unwrap_or_default().to_string()
    } else {
        field.value().into_owned()
    };
    queue!(out, MoveTo(0, 0), Print(LABEL), Print(shown))?;
    queue!(
        out,
        MoveTo(0, 2),
        Print(format!(
            "focus {} | {:?} | value '{}' | raw '{}' | {}",
            data.focused,
            state.field_state(),
            state.value(),
            state.unmasked_value(),
            if state.is_completed() { "complete" } else { "" },
        ))
    )?;
    queue!(out, MoveTo(0, 3), Print(format!("{:?}", data.last)))?;
    queue!(
        out,
        MoveTo(0, 5),
        Print("Tab toggles focus. Esc quits.")
    )?;

    let col = LABEL.len() as u16 + field.caret() as u16;
    queue!(out, MoveTo(col, 0))?;
    out.flush()?;
    Ok(())
}

fn setup_logging() -> Result<(), anyhow::Error> {
    let log = PathBuf::from("phone.log");
    if log.exists() {
        fs::remove_file(&log)?;
    }
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("{} {}", record.level(), message))
        })
        .level(log::LevelFilter::Trace)
        .chain(fern::log_file(&log)?)
        .apply()?;
    Ok(())
}
