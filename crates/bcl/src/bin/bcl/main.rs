mod cli;

use bcl::bravefile::Bravefile;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("BCL_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Render(render_cli) => render(render_cli),
        cli::Command::Check(check_cli) => check(check_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn render(cli: cli::RenderCommand) -> anyhow::Result<()> {
    let bravefile = load(&cli.input)?;
    output(&cli.output, &bravefile)?;
    Ok(())
}

pub fn check(cli: cli::CheckCommand) -> anyhow::Result<()> {
    load(&cli.input)?;
    match &cli.input.file {
        Some(path) => eprintln!("{}: ok", path.display()),
        None => eprintln!("<stdin>: ok"),
    }
    Ok(())
}

fn load(input: &cli::InputArgs) -> anyhow::Result<Bravefile> {
    let Some(path) = &input.file else {
        let stdin = std::io::read_to_string(std::io::stdin())?;
        return Ok(bcl::from_str(&stdin)?);
    };

    let bravefile = bcl::from_file(path)
        .map_err(|e| anyhow::Error::new(e).context(format!("Failed to bind {}", path.display())))?;
    Ok(bravefile)
}

fn output(output: &cli::OutputArgs, bravefile: &Bravefile) -> anyhow::Result<()> {
    match output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), bravefile)?,
        cli::OutputFormat::Json => serde_json::to_writer_pretty(std::io::stdout(), bravefile)?,
    };

    Ok(())
}
