//! Main mirror command

use crate::mirror::{Mirror, StopSignal};
use crate::types::MirrorError;
use crate::Config;
use console::style;

/// Run the mirror, either once or as a polling loop
pub fn run(config: Config) -> Result<(), MirrorError> {
    println!("{} {}", style("doppel").bold().cyan(), crate::VERSION);

    // Creating the mirror echoes the launch header when logging to a file,
    // so the plain summary is only needed in console-only mode.
    let mirror = Mirror::new(config)?;
    if mirror.log_path().is_none() {
        println!("{}", format_launch_summary(mirror.config()));
    }

    if mirror.config().once {
        let stats = mirror.run_pass()?;
        if stats.is_noop() {
            println!("Nothing to mirror.");
        }
        return Ok(());
    }

    println!(
        "Mirroring every {:?}; stop with Ctrl-C.",
        mirror.config().interval
    );
    mirror.run_until_stopped(&StopSignal::new());
    Ok(())
}

fn format_launch_summary(config: &Config) -> String {
    let mut lines = vec![
        format!("  Watched:  {}", config.watched_dir.display()),
        format!("  Copy-to:  {}", config.copy_dir.display()),
        format!("  Compare:  {}", config.compare_mode),
    ];
    if config.once {
        lines.push("  Mode:     single pass".to_string());
    } else {
        lines.push(format!("  Interval: {:?}", config.interval));
    }
    lines.join("\n")
}
