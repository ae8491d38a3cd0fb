use clap::Parser;
use color_eyre::Result;
use sucal_tui::cli::{self, Cli, Commands};
use sucal_tui::{Config, Profile, ScheduleStore, trace};

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();
    let profile = if args.dev { Profile::Dev } else { Profile::Prod };

    let config = Config::load_with_profile(profile)?;
    let storage_dir = config.get_storage_dir();

    // TUI sessions log to a file so the alternate screen stays clean
    let command = args.command.unwrap_or(Commands::Tui);
    match command {
        Commands::Tui => trace::init_for_tui(&storage_dir),
        _ => trace::init_for_cli(),
    }

    let mut store = ScheduleStore::open(storage_dir);

    match command {
        Commands::Tui => {
            let app = sucal_tui::tui::App::new(config, store);
            sucal_tui::tui::run_event_loop(app)?;
        }
        Commands::Add {
            title,
            date,
            time,
            category,
            platform,
            notes,
        } => {
            cli::handle_add(&mut store, title, date, time, category, platform, notes)?;
        }
        Commands::List { date, all } => {
            cli::handle_list(&store, date, all)?;
        }
        Commands::Post { id } => {
            cli::handle_post(&store, id)?;
        }
        Commands::Export {
            id,
            format,
            template,
            out,
        } => {
            cli::handle_export(&store, &config, id, format, template, out)?;
        }
    }

    Ok(())
}
