use anyhow::{Context, Result};
use clap::Parser;
use sdk_prep::settings::load_settings;
use sdk_prep::{Args, Command, logging, run_extract, run_packages};

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref()).context("load settings")?;
    if let Some(base) = args.base {
        settings.base = base;
    }

    match args.command {
        Command::Extract {
            src,
            dest,
            with_classes,
        } => {
            run_extract(&settings, &src, &dest, with_classes)
                .with_context(|| format!("extract {} into {}", src.display(), dest.display()))?;
        }
        Command::Packages {
            root,
            hidden,
            output,
        } => {
            run_packages(&settings, &root, hidden, output.as_deref())
                .with_context(|| format!("list packages under {}", root.display()))?;
        }
    }

    Ok(())
}
