use std::env;

use anyhow::bail;
use board_logging::board_info;
use jobboard_core::{update, AppState, AppViewModel, Msg};
use jobboard_engine::{ensure_state_dir, EngineConfig, Session, SessionContext, StateDir};

use super::config::{AppConfig, API_URL_ENV};
use super::effects::EffectRunner;
use super::{logging, persistence, render};
use crate::cli::{Cli, Command};

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(&cli.config)?.with_api_url_override(env::var(API_URL_ENV).ok());
    ensure_state_dir(&config.state_dir)?;
    logging::initialize(
        config.log_destination,
        logging::parse_level(&config.log_level),
        &config.state_dir,
    );
    board_info!("jobboard using API at {}", config.api_base_url);

    let state_dir = StateDir::new(config.state_dir.clone());
    let engine_config = EngineConfig::new(config.api_settings());

    match cli.command {
        Command::Logout => {
            if persistence::clear_session(&state_dir) {
                println!("Signed out.");
            } else {
                println!("Not signed in.");
            }
            Ok(())
        }
        Command::Login { token, user_id } => {
            let runner = EffectRunner::new(engine_config, SessionContext::new(), state_dir)?;
            let session = runner.sign_in(token, user_id)?;
            println!("Signed in as {}", session.viewer().display_name);
            Ok(())
        }
        command => {
            let session = persistence::load_session(&state_dir);
            let context = session
                .clone()
                .map(SessionContext::with_session)
                .unwrap_or_default();
            let runner = EffectRunner::new(engine_config, context, state_dir)?;
            let mut controller = Controller::new(runner);
            controller.dispatch(Msg::SessionRestored(session.as_ref().map(Session::viewer)));
            execute(&mut controller, command)
        }
    }
}

struct Controller {
    state: AppState,
    runner: EffectRunner,
}

impl Controller {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    /// Feed engine replies back in until nothing is in flight.
    fn settle(&mut self) -> anyhow::Result<AppViewModel> {
        while self.state.is_busy() {
            let msg = self.runner.next_msg()?;
            self.dispatch(msg);
        }
        // The expiry event can trail the reply that caused it.
        if self.state.viewer().is_some() && !self.runner.session_active() {
            self.dispatch(Msg::SessionExpired);
        }
        self.state.consume_dirty();
        let view = self.state.view();
        if view.signed_out {
            bail!(view
                .notice
                .unwrap_or_else(|| "Your session has expired.".to_string()));
        }
        Ok(view)
    }
}

fn execute(controller: &mut Controller, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Jobs(args) => {
            controller.runner.scope_jobs_to(args.employer.clone());
            controller.dispatch(Msg::JobBoardOpened);
            for change in args.filter_changes() {
                controller.dispatch(Msg::FilterChanged(change));
            }
            if args.sort.is_some() {
                controller.dispatch(Msg::SortChanged(args.sort));
            }
            let view = controller.settle()?;
            print_notice(&view);
            print!("{}", render::render_jobs(&view, false));
        }
        Command::Saved => {
            if controller.state.candidate_id().is_none() {
                bail!("Sign in as a candidate to see saved jobs.");
            }
            controller.dispatch(Msg::JobBoardOpened);
            let view = controller.settle()?;
            print_notice(&view);
            print!("{}", render::render_jobs(&view, true));
        }
        Command::Bookmark { job_id } => {
            controller.dispatch(Msg::BookmarkClicked {
                job_id: job_id.clone(),
            });
            let view = controller.settle()?;
            if let Some(notice) = &view.notice {
                bail!(notice.clone());
            }
            if controller.state.saved().contains(&job_id) {
                println!("Saved job {job_id}.");
            } else {
                println!("Removed job {job_id} from saved jobs.");
            }
        }
        Command::Applications { job } => {
            controller.dispatch(match job {
                Some(job_id) => Msg::JobApplicationsOpened { job_id },
                None => Msg::ApplicationsOpened,
            });
            let view = controller.settle()?;
            print!("{}", render::render_viewer(&view));
            print_notice(&view);
            print!("{}", render::render_applications(&view));
        }
        Command::Apply {
            job_id,
            cover_letter,
            resume_url,
        } => {
            controller.dispatch(Msg::ApplyClicked {
                job_id,
                cover_letter,
                resume_url,
            });
            let view = controller.settle()?;
            print_notice(&view);
        }
        Command::Review {
            application_id,
            status,
            notes,
        } => {
            controller.dispatch(Msg::StatusChangeRequested {
                application_id,
                status: status.into(),
                notes,
            });
            let view = controller.settle()?;
            print_notice(&view);
        }
        Command::Login { .. } | Command::Logout => {}
    }
    Ok(())
}

fn print_notice(view: &AppViewModel) {
    if let Some(notice) = &view.notice {
        println!("{notice}");
    }
}
