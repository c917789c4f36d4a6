fn main() -> anyhow::Result<()> {
    homesense_lib::run()
}
