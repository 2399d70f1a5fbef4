fn main() -> anyhow::Result<()> {
    ifrmc_cli::run()
}
