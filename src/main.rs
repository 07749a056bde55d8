use clap::Parser;
use miette::Result;
use spritecut::cli::{Cli, Commands};
use spritecut::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new().with_verbose(cli.verbose);

    match cli.command {
        Commands::Extract(args) => {
            spritecut::cli::extract::run(args, &printer)?;
        }
        Commands::Inspect(args) => {
            spritecut::cli::inspect::run(args, &printer)?;
        }
        Commands::Matte(args) => {
            spritecut::cli::matte::run(args, &printer)?;
        }
        Commands::Pack(args) => {
            spritecut::cli::pack::run(args, &printer)?;
        }
        Commands::Init(args) => {
            spritecut::cli::init::run(args, &printer)?;
        }
        Commands::Completions(args) => spritecut::cli::completions::run(args)?,
    }

    Ok(())
}
