mod cli_args;
#[cfg(unix)]
mod cli_build;
mod common;
