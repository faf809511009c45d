fn main() -> anyhow::Result<()> {
    langhd::cli::run()
}
