use clap::Parser;
use scorm_cli::{
	cli::Cli,
	commands,
	error::CliError,
	logging,
	output::{self, CommandResult, OutputFormat},
};

fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let format = cli.format;

	if let Err(err) = commands::dispatch(cli) {
		// Run reports are printed before their expectation failure surfaces
		if !err.is_output_already_printed() {
			handle_error(err, format);
		}
		std::process::exit(1);
	}
}

fn handle_error(err: CliError, format: OutputFormat) {
	let cmd_error = err.to_command_error();

	// Always print to stderr for humans
	output::print_error_stderr(&cmd_error);

	// JSON callers also get the envelope on stdout
	if format == OutputFormat::Json {
		let result: CommandResult<()> = CommandResult::failure("run", cmd_error);
		output::print_result(&result, format);
	}
}
