//! CLI entry point for `fmtkit`.

fn main() -> anyhow::Result<()> {
    fmtkit::cli::CommandLineInterface::load().run()
}
