//! `sts-fetch` binary: parse flags, run the exchange-then-fetch workflow, print the body.

// std
use std::{
	io::{self, Write},
	process::ExitCode,
};
// crates.io
use clap::Parser;
// self
use sts_fetch::{cli::Args, error::Error, flows::Fetcher, obs};

#[tokio::main]
async fn main() -> ExitCode {
	let args = Args::parse();

	obs::install_subscriber(args.json_logs);

	match run(args).await {
		Ok(body) => match write_body(&mut io::stdout().lock(), &body) {
			Ok(()) => ExitCode::SUCCESS,
			Err(e) => {
				tracing::error!(error = %e, "failed to write the resource body to stdout");

				ExitCode::FAILURE
			},
		},
		Err(e) => {
			tracing::error!(
				phase = e.phase().map(|phase| phase.as_str()),
				exit_code = e.exit_code(),
				error = %e,
				"sts-fetch failed"
			);

			ExitCode::from(e.exit_code())
		},
	}
}

async fn run(args: Args) -> Result<Vec<u8>, Error> {
	let config = args.into_config()?;
	let fetcher = Fetcher::from_config(&config)?;
	let outcome = fetcher
		.run_until(async {
			// A failed handler registration must not look like an interrupt.
			if tokio::signal::ctrl_c().await.is_err() {
				std::future::pending::<()>().await;
			}
		})
		.await?;

	tracing::info!(
		status = outcome.resource.status,
		body_len = outcome.resource.body.len(),
		"resource fetched"
	);

	Ok(outcome.resource.body)
}

fn write_body(out: &mut impl Write, body: &[u8]) -> io::Result<()> {
	out.write_all(body)?;
	out.flush()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	struct FailingFlush(Vec<u8>);
	impl Write for FailingFlush {
		fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
			self.0.extend_from_slice(buf);

			Ok(buf.len())
		}

		fn flush(&mut self) -> io::Result<()> {
			Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
		}
	}

	#[test]
	fn write_body_reports_flush_failures() {
		let mut out = FailingFlush(Vec::new());
		let err = write_body(&mut out, b"resource").expect_err("Flush failures must surface.");

		assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
		assert_eq!(out.0, b"resource");
	}

	#[test]
	fn write_body_copies_bytes_verbatim() {
		let mut out = Vec::new();

		write_body(&mut out, b"\x00binary\xff").expect("Vec writers never fail.");

		assert_eq!(out, b"\x00binary\xff");
	}
}
