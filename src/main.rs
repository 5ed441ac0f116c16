fn main() -> anyhow::Result<()> {
    transparent_icon::cli::run()
}
