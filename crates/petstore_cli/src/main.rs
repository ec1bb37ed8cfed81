//! `pets` executable entry point.

fn main() -> anyhow::Result<()> {
    petstore_cli::run_cli()
}
