#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = strandfx_harness::run_from_env() {
        tracing::error!(exit_code = error.exit_code(), "{error}");
        eprintln!("{error}");
        std::process::exit(error.exit_code());
    }
}
