use std::io::Write;

/// Route `log` output to stderr, message only.
///
/// `info` by default, `debug` with `-v`, `warn` with `-q`. `RUST_LOG`
/// overrides all of these.
pub(crate) fn init(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}
