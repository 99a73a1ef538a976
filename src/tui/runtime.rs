use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow};
use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{self, Event, KeyEventKind};

use super::app::{App, Outcome};

/// Take over the terminal and run `app` until the user accepts or cancels.
pub fn run(app: &mut App) -> Result<Outcome> {
	let mut terminal = ratatui::init();
	let result = drive(&mut terminal, app);
	ratatui::restore();
	result
}

fn drive(terminal: &mut DefaultTerminal, app: &mut App) -> Result<Outcome> {
	terminal.clear()?;
	app.hydrate();

	let (event_tx, event_rx) = mpsc::channel();
	let event_loop_running = Arc::new(AtomicBool::new(true));
	let event_loop_flag = Arc::clone(&event_loop_running);

	let event_thread = thread::spawn(move || -> Result<()> {
		while event_loop_flag.load(Ordering::Relaxed) {
			if event::poll(Duration::from_millis(50))? {
				let event = event::read()?;
				if event_tx.send(event).is_err() {
					break;
				}
			}
		}
		Ok(())
	});

	let mut pending_events = VecDeque::new();

	let result: Result<Outcome> = 'event_loop: loop {
		app.pump_builds();
		app.tick();

		loop {
			match event_rx.try_recv() {
				Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
					pending_events.push_back(key);
				}
				Ok(_) => {}
				Err(mpsc::TryRecvError::Empty) => break,
				Err(mpsc::TryRecvError::Disconnected) => {
					break 'event_loop Err(anyhow!("input event channel disconnected"));
				}
			}
		}

		while let Some(key) = pending_events.pop_front() {
			if let Some(outcome) = app.handle_key(key) {
				break 'event_loop Ok(outcome);
			}
		}

		if let Err(err) = terminal.draw(|frame| app.draw(frame)) {
			break Err(err.into());
		}

		thread::sleep(Duration::from_millis(16));
	};

	event_loop_running.store(false, Ordering::Relaxed);
	match event_thread.join() {
		Ok(join_result) => join_result?,
		Err(err) => std::panic::resume_unwind(err),
	}

	result
}
