use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use log::{debug, info, warn};
use tokio::time::MissedTickBehavior;

use tallgrass::dialogue::DialogueInput;
use tallgrass::session::AudioCue;
use tallgrass::{BattleChoice, ClientIntent, Scheduler, Session, SessionError, WorldMode};

use crate::config::ClientConfig;
use crate::demo::DemoServer;
use crate::transport::Transport;
use crate::tui::{Input, Status, Tui};

pub enum Source {
    Remote(Transport),
    Demo(Box<DemoServer>),
}

impl Source {
    fn as_str(&self) -> &'static str {
        match self {
            Source::Remote(_) => "online",
            Source::Demo(_) => "demo",
        }
    }
}

pub struct App {
    config: ClientConfig,
    session: Session,
    scheduler: Scheduler,
    source: Source,
    tui: Option<Tui>,
    started: Instant,
    last_log_ms: f64,
    should_quit: bool,
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}

impl App {
    pub fn new(config: ClientConfig, mut session: Session, source: Source) -> anyhow::Result<Self> {
        let tui = if config.headless { None } else { Some(Tui::new()?) };
        // the demo stamps chat with its own clock, starting at zero
        let login = match source {
            Source::Remote(_) => epoch_ms(),
            Source::Demo(_) => 0,
        };
        session.connect(login);

        Ok(Self {
            scheduler: Scheduler::new(config.scheduler()),
            config,
            session,
            source,
            tui,
            started: Instant::now(),
            last_log_ms: 0.0,
            should_quit: false,
        })
    }

    fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut interval = tokio::time::interval(Duration::from_millis(self.config.frame_interval_ms));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.scheduler.start();
        info!("client running ({})", self.source.as_str());

        while !self.should_quit {
            interval.tick().await;
            let now = self.now_ms();

            self.pump_incoming(now);
            let report = self.scheduler.frame(now, &mut self.session);
            self.flush_outgoing(now);
            self.handle_input()?;
            self.present(now, report.fps)?;

            if let Some(limit) = self.config.run_for_secs
                && now >= limit * 1000.0
            {
                info!("run time limit reached");
                self.should_quit = true;
            }
        }

        self.shutdown();
        if let Some(tui) = &mut self.tui {
            tui.restore_terminal()?;
        }
        info!("client stopped after {} ticks", self.scheduler.total_ticks());
        Ok(())
    }

    /// Logs out and halts ticking; the final `LogOut` still reaches the source.
    fn shutdown(&mut self) {
        self.session.disconnect();
        self.scheduler.stop();
        let now = self.now_ms();
        self.flush_outgoing(now);
    }

    fn pump_incoming(&mut self, now: f64) {
        let messages = match &mut self.source {
            Source::Remote(transport) => {
                let messages = transport.poll();
                if !transport.is_connected() && self.session.is_connected() {
                    warn!("server closed the connection");
                    self.session.disconnect();
                    self.scheduler.stop();
                    self.should_quit = true;
                }
                messages
            }
            Source::Demo(demo) => demo.poll(now),
        };
        for message in messages {
            self.session.receive(now, message);
        }
    }

    fn flush_outgoing(&mut self, now: f64) {
        let intents = self.session.outbox().drain_intents();
        for intent in intents {
            self.send(now, intent);
        }

        for cue in self.session.outbox().drain_audio() {
            match cue {
                AudioCue::Sfx { name, interrupt } => debug!("sfx {name} (interrupt: {interrupt})"),
                AudioCue::Music(name) => info!("music {name}"),
            }
        }

        // the terminal has no sprites to load, so every request resolves at once
        for request in self.session.outbox().drain_asset_requests() {
            debug!("assets for {} ({})", request.id, request.sprite_base);
            self.session.resolve_assets(request.id, true);
        }
    }

    fn send(&mut self, now: f64, intent: ClientIntent) {
        match &mut self.source {
            Source::Remote(transport) => {
                if let Err(e) = transport.send(&intent) {
                    warn!("failed to send {}: {e:#}", intent.kind());
                }
            }
            Source::Demo(demo) => demo.handle(now, intent),
        }
    }

    fn handle_input(&mut self) -> anyhow::Result<()> {
        let Some(tui) = &mut self.tui else {
            return Ok(());
        };
        let inputs = tui.poll_input()?;
        for input in inputs {
            if let Err(e) = self.apply_input(input) {
                debug!("input {input:?} rejected: {e}");
            }
        }
        Ok(())
    }

    fn apply_input(&mut self, input: Input) -> Result<(), SessionError> {
        let in_battle = matches!(self.session.mode(), WorldMode::InBattle(_));
        match input {
            Input::Quit => {
                self.should_quit = true;
                Ok(())
            }
            Input::Step(direction) => {
                let tile = self
                    .session
                    .world()
                    .local_player()
                    .map(|p| p.motion.target_tile() + direction.offset())
                    .ok_or(SessionError::Busy("move"))?;
                self.session.click_tile(tile)
            }
            Input::Confirm => self.session.dismiss(),
            Input::Number(n) if self.session.conversation().is_some() => {
                self.session.dialogue_input(DialogueInput::Choose(n))
            }
            Input::Number(slot) if in_battle => self.session.choose_battle(BattleChoice::Attack { slot }),
            Input::UseItem => self.session.choose_battle(BattleChoice::Item { inventory_index: 0 }),
            Input::Flee => self.session.choose_battle(BattleChoice::Flee),
            Input::Swap => {
                let party_index = self.swap_target().ok_or(SessionError::Busy("swap"))?;
                self.session.choose_battle(BattleChoice::Swap { party_index })
            }
            Input::Wave => self.session.chat("*waves*", true),
            Input::Number(_) => Ok(()),
        }
    }

    fn swap_target(&self) -> Option<usize> {
        let active = self.session.battle()?.active_index();
        let player = self.session.world().local_player()?;
        player
            .party
            .iter()
            .enumerate()
            .find(|(i, c)| *i != active && !c.is_fainted())
            .map(|(i, _)| i)
    }

    fn present(&mut self, now: f64, fps: f64) -> anyhow::Result<()> {
        let Some(view) = self.session.last_frame() else {
            return Ok(());
        };

        if let Some(tui) = &mut self.tui {
            let status = Status {
                fps,
                ticks: self.scheduler.total_ticks(),
                tile_size: self.session.world().config().tile_size,
                source: self.source.as_str(),
                music: self.session.current_music().map(str::to_string),
            };
            tui.draw(view, &status)?;
        } else if now - self.last_log_ms >= self.config.headless_log_interval_ms {
            self.last_log_ms = now;
            let stats = match &self.source {
                Source::Remote(transport) => format!(
                    " | frames {}/{} bytes {}/{}",
                    transport.stats().frames_sent,
                    transport.stats().frames_received,
                    transport.stats().bytes_sent,
                    transport.stats().bytes_received
                ),
                Source::Demo(_) => String::new(),
            };
            info!(
                "{} | fps {:.0} | ticks {} | entities {} | chat {}{}",
                view.scene.as_str(),
                fps,
                self.scheduler.total_ticks(),
                view.entity_count,
                view.chat.len(),
                stats
            );
        }
        Ok(())
    }
}
