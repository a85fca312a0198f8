//! Cadence CLI Application
//!
//! Command-line interface for building, importing and scheduling generated
//! training programs.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use cadence_core::{
    CoachBuilder, CoachError, OperationStatus, Scheduler, Slots,
    params::{ListPrograms, Schedule},
};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        today,
        command,
    } = Args::parse();

    let renderer = TerminalRenderer::new(!no_color);

    // Commands that never touch the database.
    let command = match command {
        Some(Commands::Schedule(args)) => {
            let scheduler = today.map_or_else(Scheduler::from_system_clock, Scheduler::new);
            let params = Schedule::from(args);
            let slots = scheduler.schedule_slots(
                params.start_date,
                params.number_of_weeks,
                &params.weekdays,
            )?;
            return cli::render_schedule(&renderer, Slots(slots));
        }
        Some(Commands::Normalize(args)) => {
            let reply = cli::read_input(args.file.as_deref())?;
            return cli::normalize_reply(&renderer, &reply);
        }
        other => other,
    };

    let mut builder = CoachBuilder::new().with_database_path(database_file);
    if let Some(today) = today {
        builder = builder.with_today(today);
    }
    let coach = builder.build().await.context("Failed to initialize coach")?;

    info!("Cadence started");

    let cli = Cli::new(coach, renderer);
    let result = match command {
        Some(Commands::Program { command }) => cli.handle_program_command(command).await,
        Some(Commands::Workout { command }) => cli.handle_workout_command(command).await,
        Some(Commands::Prompt(args)) => cli.prompt(&args).await,
        Some(Commands::Import(args)) => cli.import(args).await,
        Some(Commands::Schedule(_) | Commands::Normalize(_)) => Ok(()),
        None => cli.list_programs(&ListPrograms::default()).await,
    };

    if let Err(e) = &result
        && let Some(error) = e.downcast_ref::<CoachError>()
        && error.is_data_loss()
    {
        eprint!("{}", OperationStatus::from_error(error));
    }
    result
}
