use clap::error::ErrorKind;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use dirsync::callbacks::TracingLog;
use dirsync::logging::*;
use dirsync::profiles::default_profiles_path;
use dirsync::progress::CliProgress;
use dirsync::util::format_file_size;
use dirsync::{
	directory_info, ConflictPolicy, ProfileStore, SyncConfig, SyncMode, SyncProfile, Synchronizer,
};

/// Exit code for a run stopped with Ctrl-C
const EXIT_INTERRUPTED: i32 = 130;

///////////////////////
// Command line      //
///////////////////////

fn sync_args(cmd: Command) -> Command {
	cmd.arg(
		Arg::new("source")
			.value_name("SOURCE")
			.value_parser(value_parser!(PathBuf))
			.help("Source directory (optional with --profile)"),
	)
	.arg(
		Arg::new("target")
			.value_name("TARGET")
			.value_parser(value_parser!(PathBuf))
			.help("Target directory (optional with --profile)"),
	)
	.arg(
		Arg::new("mode")
			.short('m')
			.long("mode")
			.value_name("MODE")
			.value_parser(value_parser!(SyncMode))
			.help("one-way or two-way"),
	)
	.arg(
		Arg::new("filter")
			.short('f')
			.long("filter")
			.value_name("RULES")
			.help("Filter rules, e.g. \"*.txt;!draft*.txt\""),
	)
	.arg(
		Arg::new("conflicts")
			.short('c')
			.long("conflicts")
			.value_name("POLICY")
			.value_parser(value_parser!(ConflictPolicy))
			.help("keep-both, prefer-source, prefer-target or skip"),
	)
}

fn build_cli() -> Command {
	Command::new("dirsync")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Two-directory file synchronizer")
		.disable_version_flag(true)
		.arg_required_else_help(true)
		.arg(
			Arg::new("version")
				.short('v')
				.long("version")
				.action(ArgAction::Version)
				.help("Print version"),
		)
		.arg(
			Arg::new("use_profile")
				.short('p')
				.long("profile")
				.value_name("NAME")
				.global(true)
				.help("Take source, target, mode and filter from a stored profile"),
		)
		.arg(
			Arg::new("profiles")
				.long("profiles")
				.value_name("FILE")
				.value_parser(value_parser!(PathBuf))
				.global(true)
				.help("Profile file (default: $HOME/.config/dirsync/profiles.json)"),
		)
		.subcommand(sync_args(Command::new("sync").about("Synchronize two directories")))
		.subcommand(sync_args(
			Command::new("preview").about("Show what a sync would do without changing anything"),
		))
		.subcommand(
			Command::new("info")
				.about("Show file count and total size of a directory")
				.arg(Arg::new("dir").required(true).value_parser(value_parser!(PathBuf))),
		)
		.subcommand(
			Command::new("profile")
				.about("Manage stored profiles")
				.subcommand_required(true)
				.subcommand(
					Command::new("save")
						.about("Save or replace a profile")
						.arg(Arg::new("name").required(true))
						.arg(Arg::new("source").required(true).value_parser(value_parser!(PathBuf)))
						.arg(Arg::new("target").required(true).value_parser(value_parser!(PathBuf)))
						.arg(
							Arg::new("mode")
								.short('m')
								.long("mode")
								.value_parser(value_parser!(SyncMode)),
						)
						.arg(Arg::new("filter").short('f').long("filter")),
				)
				.subcommand(Command::new("list").about("List stored profiles"))
				.subcommand(
					Command::new("delete")
						.about("Delete a profile")
						.arg(Arg::new("name").required(true)),
				),
		)
		.subcommand(Command::new("version").about("Print version"))
}

///////////////////////
// Utility functions //
///////////////////////

fn profiles_path(matches: &ArgMatches) -> Result<PathBuf, Box<dyn Error>> {
	match matches.get_one::<PathBuf>("profiles") {
		Some(path) => Ok(path.clone()),
		None => default_profiles_path()
			.ok_or_else(|| "Could not determine HOME directory, use --profiles".into()),
	}
}

/// Merge a stored profile (if requested) with the command-line overrides
fn build_config(matches: &ArgMatches) -> Result<SyncConfig, Box<dyn Error>> {
	let mut profile = match matches.get_one::<String>("use_profile") {
		Some(name) => {
			let store = ProfileStore::load(profiles_path(matches)?)?;
			store.get(name)?.clone()
		}
		None => SyncProfile::default(),
	};

	if let Some(source) = matches.get_one::<PathBuf>("source") {
		profile.source_path = source.clone();
	}
	if let Some(target) = matches.get_one::<PathBuf>("target") {
		profile.target_path = target.clone();
	}
	if let Some(mode) = matches.get_one::<SyncMode>("mode") {
		profile.sync_mode = *mode;
	}
	if let Some(filter) = matches.get_one::<String>("filter") {
		profile.filter_rules = filter.clone();
	}

	if profile.source_path.as_os_str().is_empty() || profile.target_path.as_os_str().is_empty() {
		return Err("Both SOURCE and TARGET are required (or use --profile NAME)".into());
	}

	let policy = matches.get_one::<ConflictPolicy>("conflicts").copied().unwrap_or_default();
	Ok(SyncConfig::from_profile(&profile).conflict_policy(policy))
}

async fn run_sync(matches: &ArgMatches) -> Result<i32, Box<dyn Error>> {
	let config = build_config(matches)?.on_progress(CliProgress::new()).on_log(TracingLog);

	let synchronizer = Arc::new(Synchronizer::new());
	let stop = synchronizer.cancel_handle();
	tokio::spawn(async move {
		if tokio::signal::ctrl_c().await.is_ok() {
			warn!("Interrupt received, stopping after the current file");
			stop.cancel();
		}
	});

	// `run` keeps a stop that lands before the worker starts
	let worker = synchronizer.clone();
	let outcome = tokio::task::spawn_blocking(move || worker.run(&config)).await??;

	println!("{}", outcome.summary);
	if outcome.cancelled {
		return Ok(EXIT_INTERRUPTED);
	}
	Ok(0)
}

fn run_preview(matches: &ArgMatches) -> Result<i32, Box<dyn Error>> {
	let config = build_config(matches)?;
	let plan = Synchronizer::new().preview(&config)?;

	for action in &plan.actions {
		println!("{}", action);
	}
	let stats = plan.stats;
	println!(
		"Total: {} (copy {}, update {}; source → target {}, target → source {})",
		stats.total, stats.copy, stats.update, stats.source_to_target, stats.target_to_source
	);
	Ok(0)
}

fn run_info(matches: &ArgMatches) -> Result<i32, Box<dyn Error>> {
	let dir = matches.get_one::<PathBuf>("dir").ok_or("info: directory argument required")?;
	let info = directory_info(dir)
		.ok_or_else(|| format!("Directory does not exist: {}", dir.display()))?;
	println!(
		"{}: {} files, {}",
		dir.display(),
		info.total_files,
		format_file_size(info.total_size)
	);
	Ok(0)
}

fn run_profile(matches: &ArgMatches) -> Result<i32, Box<dyn Error>> {
	// Global args given after the nested subcommand only land in its matches
	let (action, sub) = matches.subcommand().ok_or("profile: subcommand required")?;
	let mut store = ProfileStore::load(profiles_path(sub)?)?;

	match (action, sub) {
		("save", sub) => {
			let name = sub.get_one::<String>("name").ok_or("profile save: name required")?;
			let profile = SyncProfile {
				source_path: sub.get_one::<PathBuf>("source").cloned().unwrap_or_default(),
				target_path: sub.get_one::<PathBuf>("target").cloned().unwrap_or_default(),
				sync_mode: sub.get_one::<SyncMode>("mode").copied().unwrap_or_default(),
				filter_rules: sub.get_one::<String>("filter").cloned().unwrap_or_default(),
			};
			store.insert(name.clone(), profile);
			store.save()?;
			println!("Saved profile '{}' to {}", name, store.path().display());
		}
		("list", _) => {
			for (name, profile) in store.iter() {
				println!(
					"{}: {} -> {} ({}){}",
					name,
					profile.source_path.display(),
					profile.target_path.display(),
					profile.sync_mode,
					if profile.filter_rules.is_empty() {
						String::new()
					} else {
						format!(" [{}]", profile.filter_rules)
					}
				);
			}
		}
		("delete", sub) => {
			let name = sub.get_one::<String>("name").ok_or("profile delete: name required")?;
			store.remove(name)?;
			store.save()?;
			println!("Deleted profile '{}'", name);
		}
		_ => return Err("profile: unknown subcommand".into()),
	}
	Ok(0)
}

#[tokio::main]
async fn main() {
	let matches = match build_cli().try_get_matches() {
		Ok(m) => m,
		Err(e) => {
			let code = match e.kind() {
				ErrorKind::DisplayHelp
				| ErrorKind::DisplayVersion
				| ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
				_ => 1,
			};
			let _ = e.print();
			if code != 0 {
				eprintln!("Run 'dirsync --help' for usage.");
			}
			process::exit(code);
		}
	};

	dirsync::logging::init_tracing();

	let result = match matches.subcommand() {
		Some(("sync", sub)) => run_sync(sub).await,
		Some(("preview", sub)) => run_preview(sub),
		Some(("info", sub)) => run_info(sub),
		Some(("profile", sub)) => run_profile(sub),
		Some(("version", _)) => {
			println!("dirsync {}", env!("CARGO_PKG_VERSION"));
			Ok(0)
		}
		_ => Err("No command given".into()),
	};

	match result {
		Ok(code) => process::exit(code),
		Err(e) => {
			eprintln!("Error: {}", e);
			process::exit(1);
		}
	}
}

// vim: ts=4
